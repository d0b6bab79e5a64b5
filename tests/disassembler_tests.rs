//! Tests for the disassembler and its round-trip with the assembler.

use pipeline_sim::asm::{assemble, disassemble, disassemble_program};
use pipeline_sim::core::isa;

/// The all-zero word disassembles as `nop`.
#[test]
fn test_disassemble_zero_is_nop() {
    assert_eq!(disassemble(0), "nop");
}

/// `beq r0, r0, -1` disassembles as the canonical `halt`.
#[test]
fn test_disassemble_halt() {
    let word = isa::encode_itype(isa::OP_BEQ, 0, 0, -1);
    assert_eq!(disassemble(word), "halt");
}

/// Every instruction form disassembles to its canonical mnemonic string.
#[test]
fn test_disassemble_all_forms() {
    assert_eq!(
        disassemble(isa::encode_rtype(2, 3, 1, isa::FUNC_SUB)),
        "sub r1, r2, r3"
    );
    assert_eq!(
        disassemble(isa::encode_itype(isa::OP_ADDI, 0, 1, 10)),
        "addi r1, r0, 10"
    );
    assert_eq!(
        disassemble(isa::encode_itype(isa::OP_LW, 1, 2, 4)),
        "lw r2, 4(r1)"
    );
    assert_eq!(
        disassemble(isa::encode_itype(isa::OP_SW, 1, 2, 4)),
        "sw r2, 4(r1)"
    );
    assert_eq!(
        disassemble(isa::encode_itype(isa::OP_BEQ, 1, 2, -3)),
        "beq r1, r2, -3"
    );
    assert_eq!(disassemble(isa::encode_itype(isa::OP_J, 0, 0, 5)), "j 5");
    assert_eq!(disassemble(isa::encode_itype(isa::OP_JAL, 0, 0, 5)), "jal 5");
    assert_eq!(disassemble(isa::encode_itype(isa::OP_JR, 7, 0, 0)), "jr r7");
}

/// An unrecognized opcode or R-type `func` disassembles to `??` plus the
/// raw hex word.
#[test]
fn test_disassemble_unknown() {
    let word = isa::encode_rtype(0, 0, 0, 0b111);
    assert_eq!(disassemble(word), format!("?? {word:#06x}"));
}

/// `disassemble_program` maps each word independently, in order.
#[test]
fn test_disassemble_program() {
    let words = vec![0, isa::encode_itype(isa::OP_J, 0, 0, 1)];
    assert_eq!(disassemble_program(&words), vec!["nop", "j 1"]);
}

/// Assembling then disassembling every supported form round-trips to a
/// semantically equivalent line, modulo canonical spacing and the
/// `nop`/`halt` pseudo-instruction canonicalization.
#[test]
fn test_assemble_disassemble_round_trip() {
    let cases = [
        ("add r1, r2, r3", "add r1, r2, r3"),
        ("addi r1, r0, 10", "addi r1, r0, 10"),
        ("lw r2, 4(r1)", "lw r2, 4(r1)"),
        ("sw r2, 4(r1)", "sw r2, 4(r1)"),
        ("beq r1, r2, -3", "beq r1, r2, -3"),
        ("j 5", "j 5"),
        ("jal 5", "jal 5"),
        ("jr r7", "jr r7"),
        ("nop", "nop"),
        ("halt", "halt"),
    ];
    for (src, expected) in cases {
        let words = assemble(src).unwrap_or_else(|e| panic!("assembling {src:?}: {e}"));
        assert_eq!(words.len(), 1);
        assert_eq!(disassemble(words[0]), expected, "round trip for {src:?}");
    }
}
