//! Pipeline control signals and the ALU op selector.
//!
//! `ControlSignals` is the 8-bit control bus carried alongside an
//! instruction from ID through WB. A bubble is the all-`false` vector:
//! every downstream stage treats it as a NOP because every side effect is
//! gated by one of these bits.

use serde::Serialize;

use crate::core::isa;

/// 3-bit ALU operation selector, numbered identically to the R-type `func`
/// field so a decoded `func` can be reinterpreted directly as an `AluOp`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum AluOp {
    /// `a + b`.
    #[default]
    Add,
    /// `a - b`.
    Sub,
    /// `a & b`.
    And,
    /// `a | b`.
    Or,
    /// `a ^ b`.
    Xor,
    /// `1` if `a < b` signed, else `0`.
    Slt,
    /// `a / b` truncated toward zero; `0` if `b == 0`.
    Div,
}

impl AluOp {
    /// Maps an R-type `func` field to its `AluOp`. Unknown funcs default to `Add`.
    pub fn from_func(func: u8) -> Self {
        match func {
            isa::FUNC_ADD => AluOp::Add,
            isa::FUNC_SUB => AluOp::Sub,
            isa::FUNC_AND => AluOp::And,
            isa::FUNC_OR => AluOp::Or,
            isa::FUNC_XOR => AluOp::Xor,
            isa::FUNC_SLT => AluOp::Slt,
            isa::FUNC_DIV => AluOp::Div,
            _ => AluOp::Add,
        }
    }
}

/// The 8-bit control bus. A bubble is `ControlSignals::default()` (all `false`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ControlSignals {
    /// Destination register is `rd` (R-type) rather than `rt`.
    pub reg_dst: bool,
    /// Second ALU operand is the immediate rather than `rt`'s value.
    pub alu_src: bool,
    /// Writeback value comes from memory rather than the ALU result.
    pub mem_to_reg: bool,
    /// Destination register is written in WB.
    pub reg_write: bool,
    /// A word is read from data memory in MEM.
    pub mem_read: bool,
    /// A word is written to data memory in MEM.
    pub mem_write: bool,
    /// Instruction is a conditional branch (BEQ).
    pub branch: bool,
    /// Instruction is an unconditional control transfer (J/JAL/JR).
    pub jump: bool,
}

impl ControlSignals {
    /// Returns `true` iff this is a bubble (no control bit set).
    pub fn is_bubble(&self) -> bool {
        *self == ControlSignals::default()
    }
}

/// Decodes the opcode (and, for R-type, `func`) into the control vector and
/// ALU op selector, per the fixed instruction table.
pub fn decode_control(op: u8, func: u8) -> (ControlSignals, AluOp) {
    match op {
        isa::OP_RTYPE => (
            ControlSignals {
                reg_dst: true,
                reg_write: true,
                ..Default::default()
            },
            AluOp::from_func(func),
        ),
        isa::OP_ADDI => (
            ControlSignals {
                alu_src: true,
                reg_write: true,
                ..Default::default()
            },
            AluOp::Add,
        ),
        isa::OP_LW => (
            ControlSignals {
                alu_src: true,
                mem_to_reg: true,
                reg_write: true,
                mem_read: true,
                ..Default::default()
            },
            AluOp::Add,
        ),
        isa::OP_SW => (
            ControlSignals {
                alu_src: true,
                mem_write: true,
                ..Default::default()
            },
            AluOp::Add,
        ),
        isa::OP_BEQ => (
            ControlSignals {
                branch: true,
                ..Default::default()
            },
            AluOp::Sub,
        ),
        isa::OP_J => (
            ControlSignals {
                jump: true,
                ..Default::default()
            },
            AluOp::Add,
        ),
        isa::OP_JAL => (
            ControlSignals {
                reg_write: true,
                jump: true,
                ..Default::default()
            },
            AluOp::Add,
        ),
        isa::OP_JR => (
            ControlSignals {
                alu_src: true,
                jump: true,
                ..Default::default()
            },
            AluOp::Add,
        ),
        _ => (ControlSignals::default(), AluOp::Add),
    }
}
