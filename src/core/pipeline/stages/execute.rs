//! Execute (EX) stage.
//!
//! Resolves forwarded operands, runs the ALU, computes the branch target
//! and the control-hazard redirect (`pc_src`), and produces EX/MEM-next.

use crate::core::pipeline::hazards::{self, ForwardSel};
use crate::core::pipeline::latches::{ExMem, IdEx, MemWb};
use crate::core::units::alu::Alu;

/// Result of one execute-stage evaluation.
pub struct ExecuteOutput {
    /// Value to commit into EX/MEM at the end of this tick.
    pub ex_mem_next: ExMem,
    /// Control-hazard redirect signal: `(Branch AND zero) OR Jump`.
    pub pc_src: bool,
    /// Redirect target when `pc_src` is asserted.
    pub pc_src_target: u8,
    /// Forwarding selector used for the `rs` operand, exposed for the snapshot.
    pub forward_a: ForwardSel,
    /// Forwarding selector used for the `rt` operand, exposed for the snapshot.
    pub forward_b: ForwardSel,
}

/// Evaluates the execute stage.
///
/// # Arguments
///
/// * `id_ex` - Current ID/EX latch.
/// * `ex_mem` - Current (not-yet-updated) EX/MEM latch, the forwarding source
///   one stage ahead.
/// * `mem_wb` - Current (not-yet-updated) MEM/WB latch, the forwarding
///   source two stages ahead; its `wb_data()` is exactly the value WB
///   writes back this same cycle.
/// * `trace` - Emit forwarding trace lines when set.
pub fn execute_stage(id_ex: &IdEx, ex_mem: &ExMem, mem_wb: &MemWb, trace: bool) -> ExecuteOutput {
    let forward_a = hazards::forward_a(id_ex, ex_mem, mem_wb);
    let forward_b = hazards::forward_b(id_ex, ex_mem, mem_wb);
    let wb_data = mem_wb.wb_data();

    let a = hazards::resolve(forward_a, ex_mem.alu_result, wb_data, id_ex.rs_val, trace, "rs");
    let reg_b = hazards::resolve(forward_b, ex_mem.alu_result, wb_data, id_ex.rt_val, trace, "rt");
    let alu_b = if id_ex.ctrl.alu_src { id_ex.imm } else { reg_b };

    let (mut alu_result, zero) = Alu::execute(id_ex.alu_op, a, alu_b);

    // Branch/link targets are relative to the instruction *following* this
    // one (the classic delay-slot-free convention): this is what makes
    // `beq r0, r0, -1` a true self-loop (`halt`) instead of a one-step-back
    // jump, and what makes a taken branch's own `+imm` reach the line the
    // assembler author actually counted from. A plain `j` has no link
    // register to anchor against and targets relative to its own address
    // instead.
    let pc_plus_1 = id_ex.pc.wrapping_add(1);
    let branch_target = (((pc_plus_1 as i32) + (id_ex.imm as i32)) & 0xFF) as u8;
    let jump_target = (((id_ex.pc as i32) + (id_ex.imm as i32)) & 0xFF) as u8;

    let is_jal = id_ex.ctrl.jump && id_ex.ctrl.reg_write && !id_ex.ctrl.alu_src;
    if is_jal {
        alu_result = pc_plus_1 as i16;
    }

    let is_jr = id_ex.ctrl.jump && id_ex.ctrl.alu_src;
    let is_plain_jump = id_ex.ctrl.jump && !id_ex.ctrl.reg_write && !id_ex.ctrl.alu_src;
    let pc_src = (id_ex.ctrl.branch && zero) || id_ex.ctrl.jump;
    let pc_src_target = if is_jr {
        (a as u16 & 0xFF) as u8
    } else if is_plain_jump {
        jump_target
    } else {
        branch_target
    };
    let branch_target = if is_plain_jump { jump_target } else { branch_target };

    ExecuteOutput {
        ex_mem_next: ExMem {
            branch_target,
            zero,
            alu_result,
            store_data: reg_b,
            dest: id_ex.dest,
            ctrl: id_ex.ctrl,
        },
        pc_src,
        pc_src_target,
        forward_a,
        forward_b,
    }
}
