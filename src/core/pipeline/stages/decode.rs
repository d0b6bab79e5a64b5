//! Decode (ID) stage.
//!
//! Decodes the instruction latched in IF/ID, looks up its control vector,
//! reads the register file with same-cycle WB bypass, and sign-extends the
//! immediate. Replaced with a bubble when EX signals a control hazard this
//! same tick.

use crate::core::isa;
use crate::core::pipeline::latches::{IdEx, IfId};
use crate::core::pipeline::signals::decode_control;
use crate::core::regfile::RegFile;

/// Result of one decode-stage evaluation.
pub struct DecodeOutput {
    /// Value to commit into ID/EX at the end of this tick.
    pub id_ex_next: IdEx,
}

/// Reads a register, splicing in the same-cycle WB bypass: if WB is
/// writing register `bypass.0 != 0` this cycle, a read of that register
/// returns `bypass.1` instead of the stored cell.
fn read_bypassed(regfile: &RegFile, idx: u8, bypass: Option<(u8, i16)>) -> i16 {
    match bypass {
        Some((reg, val)) if reg != 0 && reg == idx => val,
        _ => regfile.read(idx),
    }
}

/// Evaluates the decode stage.
///
/// # Arguments
///
/// * `if_id` - Current IF/ID latch.
/// * `regfile` - Register file, read this cycle (never mutated here).
/// * `wb_bypass` - `Some((dest, wb_data))` when WB writes a non-zero
///   register this same cycle.
/// * `flush` - `true` if EX signaled `pc_src` this same tick; forces a bubble.
pub fn decode_stage(if_id: &IfId, regfile: &RegFile, wb_bypass: Option<(u8, i16)>, flush: bool) -> DecodeOutput {
    if flush {
        return DecodeOutput {
            id_ex_next: IdEx::default(),
        };
    }

    let decoded = isa::decode(if_id.instr);
    let (ctrl, alu_op) = decode_control(decoded.op, decoded.func);

    let rs_val = read_bypassed(regfile, decoded.rs, wb_bypass);
    let rt_val = read_bypassed(regfile, decoded.rt, wb_bypass);

    let mut dest = if ctrl.reg_dst { decoded.rd } else { decoded.rt };
    let mut ctrl = ctrl;
    if decoded.op == isa::OP_JAL {
        dest = 7;
        ctrl.reg_write = true;
    }

    DecodeOutput {
        id_ex_next: IdEx {
            pc: if_id.pc_plus_1.wrapping_sub(1),
            rs_val,
            rt_val,
            imm: decoded.imm,
            rs: decoded.rs,
            rt: decoded.rt,
            dest,
            ctrl,
            alu_op,
        },
    }
}
