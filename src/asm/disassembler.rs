//! Disassembler, the inverse of the assembler.
//!
//! Produces one canonical mnemonic string per 16-bit word. An all-zero
//! word disassembles as `nop` (which is exactly how the assembler encodes
//! it); an unknown opcode or R-type `func` yields `?? 0xHHHH`.

use crate::core::isa;

/// Disassembles a single 16-bit instruction word into its canonical
/// mnemonic string.
pub fn disassemble(word: u16) -> String {
    if word == 0 {
        return "nop".to_string();
    }

    let d = isa::decode(word);

    match d.op {
        isa::OP_RTYPE => match rtype_mnemonic(d.func) {
            Some(m) => format!("{m} r{}, r{}, r{}", d.rd, d.rs, d.rt),
            None => format!("?? {word:#06x}"),
        },
        isa::OP_ADDI => format!("addi r{}, r{}, {}", d.rt, d.rs, d.imm),
        isa::OP_LW => format!("lw r{}, {}(r{})", d.rt, d.imm, d.rs),
        isa::OP_SW => format!("sw r{}, {}(r{})", d.rt, d.imm, d.rs),
        isa::OP_BEQ => {
            if d.rs == 0 && d.rt == 0 && d.imm == -1 {
                "halt".to_string()
            } else {
                format!("beq r{}, r{}, {}", d.rs, d.rt, d.imm)
            }
        }
        isa::OP_J => format!("j {}", d.imm),
        isa::OP_JAL => format!("jal {}", d.imm),
        isa::OP_JR => format!("jr r{}", d.rs),
        _ => format!("?? {word:#06x}"),
    }
}

/// Disassembles each word in `words` in order, for whole-program dumps.
pub fn disassemble_program(words: &[u16]) -> Vec<String> {
    words.iter().copied().map(disassemble).collect()
}

fn rtype_mnemonic(func: u8) -> Option<&'static str> {
    match func {
        isa::FUNC_ADD => Some("add"),
        isa::FUNC_SUB => Some("sub"),
        isa::FUNC_AND => Some("and"),
        isa::FUNC_OR => Some("or"),
        isa::FUNC_XOR => Some("xor"),
        isa::FUNC_SLT => Some("slt"),
        isa::FUNC_DIV => Some("div"),
        _ => None,
    }
}
