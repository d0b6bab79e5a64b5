//! Unit tests for the ALU.

use pipeline_sim::core::pipeline::signals::AluOp;
use pipeline_sim::core::units::alu::Alu;

/// Tests 16-bit addition, including wraparound on overflow.
#[test]
fn test_alu_add() {
    assert_eq!(Alu::execute(AluOp::Add, 10, 20), (30, false));
    assert_eq!(Alu::execute(AluOp::Add, i16::MAX, 1), (i16::MIN, false));
    assert_eq!(Alu::execute(AluOp::Add, -1, 1), (0, true));
}

/// Tests 16-bit subtraction, including wraparound.
#[test]
fn test_alu_sub() {
    assert_eq!(Alu::execute(AluOp::Sub, 30, 10), (20, false));
    assert_eq!(Alu::execute(AluOp::Sub, i16::MIN, 1), (i16::MAX, false));
    assert_eq!(Alu::execute(AluOp::Sub, 5, 5), (0, true));
}

/// Tests bitwise AND/OR/XOR.
#[test]
fn test_alu_bitwise() {
    assert_eq!(Alu::execute(AluOp::And, 0b1100, 0b1010), (0b1000, false));
    assert_eq!(Alu::execute(AluOp::Or, 0b1100, 0b1010), (0b1110, false));
    assert_eq!(Alu::execute(AluOp::Xor, 0b1100, 0b1010), (0b0110, false));
    assert_eq!(Alu::execute(AluOp::Xor, 7, 7), (0, true));
}

/// Tests signed less-than.
#[test]
fn test_alu_slt() {
    assert_eq!(Alu::execute(AluOp::Slt, -1, 1), (1, false));
    assert_eq!(Alu::execute(AluOp::Slt, 1, -1), (0, true));
    assert_eq!(Alu::execute(AluOp::Slt, 5, 5), (0, true));
}

/// Division truncates toward zero and never faults on divide-by-zero.
#[test]
fn test_alu_div() {
    assert_eq!(Alu::execute(AluOp::Div, 7, 2), (3, false));
    assert_eq!(Alu::execute(AluOp::Div, -7, 2), (-3, false));
    assert_eq!(Alu::execute(AluOp::Div, 7, 0), (0, true));
    assert_eq!(Alu::execute(AluOp::Div, -7, 0), (0, true));
}
