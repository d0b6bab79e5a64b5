//! Instruction word layout, opcode and function encodings.
//!
//! The instruction word is 16 bits, MSB to LSB:
//!
//! * R-type: `op[4] rs[3] rt[3] rd[3] func[3]`, `op = 0000`.
//! * I-type: `op[4] rs[3] rt[3] imm[6]`, `imm` sign-extended to 16 bits.

/// R-type opcode.
pub const OP_RTYPE: u8 = 0b0000;
/// `addi rt, rs, imm`.
pub const OP_ADDI: u8 = 0b0001;
/// `lw rt, imm(rs)`.
pub const OP_LW: u8 = 0b0010;
/// `sw rt, imm(rs)`.
pub const OP_SW: u8 = 0b0011;
/// `beq rs, rt, imm`.
pub const OP_BEQ: u8 = 0b0100;
/// `j imm`.
pub const OP_J: u8 = 0b0101;
/// `jal imm`.
pub const OP_JAL: u8 = 0b0110;
/// `jr rs`.
pub const OP_JR: u8 = 0b0111;

/// R-type `add rd, rs, rt`.
pub const FUNC_ADD: u8 = 0b000;
/// R-type `sub rd, rs, rt`.
pub const FUNC_SUB: u8 = 0b001;
/// R-type `and rd, rs, rt`.
pub const FUNC_AND: u8 = 0b010;
/// R-type `or rd, rs, rt`.
pub const FUNC_OR: u8 = 0b011;
/// R-type `xor rd, rs, rt`.
pub const FUNC_XOR: u8 = 0b100;
/// R-type `slt rd, rs, rt`.
pub const FUNC_SLT: u8 = 0b101;
/// R-type `div rd, rs, rt`.
pub const FUNC_DIV: u8 = 0b110;

/// Fields decoded from a raw 16-bit instruction word.
///
/// Both R-type and I-type fields are populated uniformly; callers consult
/// only the fields relevant to `op`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Decoded {
    /// Raw instruction word.
    pub word: u16,
    /// 4-bit opcode.
    pub op: u8,
    /// `rs` register index (bits 11..9).
    pub rs: u8,
    /// `rt` register index (bits 8..6).
    pub rt: u8,
    /// `rd` register index (bits 5..3), valid for R-type only.
    pub rd: u8,
    /// 3-bit function code, valid for R-type only.
    pub func: u8,
    /// Sign-extended 6-bit immediate, valid for I-type only.
    pub imm: i16,
}

/// Decodes a raw 16-bit instruction word into its constituent fields.
pub fn decode(word: u16) -> Decoded {
    let op = ((word >> 12) & 0xF) as u8;
    let rs = ((word >> 9) & 0x7) as u8;
    let rt = ((word >> 6) & 0x7) as u8;
    let rd = ((word >> 3) & 0x7) as u8;
    let func = (word & 0x7) as u8;
    let imm = sign_extend_6(word & 0x3F);
    Decoded {
        word,
        op,
        rs,
        rt,
        rd,
        func,
        imm,
    }
}

/// Sign-extends a 6-bit immediate (range `-32..=31`) to 16 bits.
pub fn sign_extend_6(bits: u16) -> i16 {
    let bits = bits & 0x3F;
    if bits & 0x20 != 0 {
        (bits | 0xFFC0) as i16
    } else {
        bits as i16
    }
}

/// Encodes an R-type instruction word.
pub fn encode_rtype(rs: u8, rt: u8, rd: u8, func: u8) -> u16 {
    ((OP_RTYPE as u16) << 12)
        | ((rs as u16 & 0x7) << 9)
        | ((rt as u16 & 0x7) << 6)
        | ((rd as u16 & 0x7) << 3)
        | (func as u16 & 0x7)
}

/// Encodes an I-type instruction word. `imm` must fit in `-32..=31`.
pub fn encode_itype(op: u8, rs: u8, rt: u8, imm: i16) -> u16 {
    ((op as u16) << 12) | ((rs as u16 & 0x7) << 9) | ((rt as u16 & 0x7) << 6) | (imm as u16 & 0x3F)
}
