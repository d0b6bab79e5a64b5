//! Line-oriented assembler.
//!
//! Comments begin with `#` and run to end of line; blank lines are
//! ignored. One instruction per non-blank line. Mnemonics, registers, and
//! the `halt` pseudo-instruction are case-insensitive register names are
//! not. Assembly is all-or-nothing: the first error aborts the whole
//! source, with no partial program returned.

use crate::common::error::AssemblyError;
use crate::core::isa;

/// Assembles `text` into a sequence of 16-bit instruction words.
///
/// # Errors
///
/// Returns the first [`AssemblyError`] encountered, with its 1-based
/// source line number and the offending token.
pub fn assemble(text: &str) -> Result<Vec<u16>, AssemblyError> {
    let mut words = Vec::new();
    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        words.push(assemble_line(line_no, line)?);
    }
    Ok(words)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    }
}

fn assemble_line(line_no: usize, line: &str) -> Result<u16, AssemblyError> {
    let mut split = line.splitn(2, char::is_whitespace);
    let mnemonic = split.next().unwrap_or("").to_lowercase();
    let rest = split.next().unwrap_or("").trim();
    let ops = split_operands(rest);

    match mnemonic.as_str() {
        "nop" => {
            require_arity(line_no, &ops, 0, "nop")?;
            Ok(isa::encode_rtype(0, 0, 0, isa::FUNC_ADD))
        }
        "halt" => {
            require_arity(line_no, &ops, 0, "halt")?;
            Ok(isa::encode_itype(isa::OP_BEQ, 0, 0, -1))
        }
        "add" | "sub" | "and" | "or" | "xor" | "slt" | "div" => {
            assemble_rtype(line_no, &mnemonic, &ops)
        }
        "addi" => assemble_addi(line_no, &ops),
        "lw" => assemble_memop(line_no, &ops, isa::OP_LW),
        "sw" => assemble_memop(line_no, &ops, isa::OP_SW),
        "beq" => assemble_beq(line_no, &ops),
        "j" => assemble_jump_imm(line_no, &ops, isa::OP_J),
        "jal" => assemble_jump_imm(line_no, &ops, isa::OP_JAL),
        "jr" => assemble_jr(line_no, &ops),
        other => Err(AssemblyError::UnknownMnemonic(line_no, other.to_string())),
    }
}

/// Splits an operand string on commas, trimming whitespace and dropping
/// any operands left empty by trailing commas.
fn split_operands(rest: &str) -> Vec<&str> {
    rest.split(',')
        .map(str::trim)
        .filter(|tok| !tok.is_empty())
        .collect()
}

fn require_arity(
    line_no: usize,
    ops: &[&str],
    expected: usize,
    form: &str,
) -> Result<(), AssemblyError> {
    if ops.len() == expected {
        Ok(())
    } else {
        Err(AssemblyError::WrongArity(line_no, form.to_string()))
    }
}

fn parse_register(line_no: usize, tok: &str) -> Result<u8, AssemblyError> {
    let lower = tok.to_lowercase();
    if let Some(digits) = lower.strip_prefix('r') {
        if let Ok(n) = digits.parse::<u32>() {
            if n <= 7 {
                return Ok(n as u8);
            }
        }
    }
    Err(AssemblyError::BadRegister(line_no, tok.to_string()))
}

fn parse_immediate(line_no: usize, tok: &str) -> Result<i16, AssemblyError> {
    match tok.parse::<i32>() {
        Ok(v) if (-32..=31).contains(&v) => Ok(v as i16),
        _ => Err(AssemblyError::ImmediateOutOfRange(line_no, tok.to_string())),
    }
}

/// Parses an `imm(rN)` memory operand, as used by `lw`/`sw`.
fn parse_mem_operand(line_no: usize, tok: &str) -> Result<(i16, u8), AssemblyError> {
    let open = tok.find('(');
    let close = tok.rfind(')');
    match (open, close) {
        (Some(o), Some(c)) if c > o && tok.ends_with(')') => {
            let imm = parse_immediate(line_no, tok[..o].trim())?;
            let reg = parse_register(line_no, tok[o + 1..c].trim())?;
            Ok((imm, reg))
        }
        _ => Err(AssemblyError::MalformedMemoryOperand(
            line_no,
            tok.to_string(),
        )),
    }
}

fn func_for_mnemonic(mnemonic: &str) -> u8 {
    match mnemonic {
        "add" => isa::FUNC_ADD,
        "sub" => isa::FUNC_SUB,
        "and" => isa::FUNC_AND,
        "or" => isa::FUNC_OR,
        "xor" => isa::FUNC_XOR,
        "slt" => isa::FUNC_SLT,
        "div" => isa::FUNC_DIV,
        _ => unreachable!("dispatched only for known R-type mnemonics"),
    }
}

/// `op rd, rs, rt`.
fn assemble_rtype(line_no: usize, mnemonic: &str, ops: &[&str]) -> Result<u16, AssemblyError> {
    require_arity(line_no, ops, 3, &format!("{mnemonic} rd, rs, rt"))?;
    let rd = parse_register(line_no, ops[0])?;
    let rs = parse_register(line_no, ops[1])?;
    let rt = parse_register(line_no, ops[2])?;
    Ok(isa::encode_rtype(rs, rt, rd, func_for_mnemonic(mnemonic)))
}

/// `addi rt, rs, imm`.
fn assemble_addi(line_no: usize, ops: &[&str]) -> Result<u16, AssemblyError> {
    require_arity(line_no, ops, 3, "addi rt, rs, imm")?;
    let rt = parse_register(line_no, ops[0])?;
    let rs = parse_register(line_no, ops[1])?;
    let imm = parse_immediate(line_no, ops[2])?;
    Ok(isa::encode_itype(isa::OP_ADDI, rs, rt, imm))
}

/// `lw rt, imm(rs)` / `sw rt, imm(rs)`.
fn assemble_memop(line_no: usize, ops: &[&str], op: u8) -> Result<u16, AssemblyError> {
    let form = if op == isa::OP_LW {
        "lw rt, imm(rs)"
    } else {
        "sw rt, imm(rs)"
    };
    require_arity(line_no, ops, 2, form)?;
    let rt = parse_register(line_no, ops[0])?;
    let (imm, rs) = parse_mem_operand(line_no, ops[1])?;
    Ok(isa::encode_itype(op, rs, rt, imm))
}

/// `beq rs, rt, imm`.
fn assemble_beq(line_no: usize, ops: &[&str]) -> Result<u16, AssemblyError> {
    require_arity(line_no, ops, 3, "beq rs, rt, imm")?;
    let rs = parse_register(line_no, ops[0])?;
    let rt = parse_register(line_no, ops[1])?;
    let imm = parse_immediate(line_no, ops[2])?;
    Ok(isa::encode_itype(isa::OP_BEQ, rs, rt, imm))
}

/// `j imm` / `jal imm`, with `rs = rt = 0`.
fn assemble_jump_imm(line_no: usize, ops: &[&str], op: u8) -> Result<u16, AssemblyError> {
    let form = if op == isa::OP_J { "j imm" } else { "jal imm" };
    require_arity(line_no, ops, 1, form)?;
    let imm = parse_immediate(line_no, ops[0])?;
    Ok(isa::encode_itype(op, 0, 0, imm))
}

/// `jr rs`, with `rt = 0, imm = 0`.
fn assemble_jr(line_no: usize, ops: &[&str]) -> Result<u16, AssemblyError> {
    require_arity(line_no, ops, 1, "jr rs")?;
    let rs = parse_register(line_no, ops[0])?;
    Ok(isa::encode_itype(isa::OP_JR, rs, 0, 0))
}
