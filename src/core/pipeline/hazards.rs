//! Data hazard detection and forwarding.
//!
//! Combinational logic consulted by the pipeline controller each cycle:
//! load-use stall detection (from the current IF/ID and ID/EX) and the
//! forwarding selectors feeding the EX stage (from ID/EX, EX/MEM, MEM/WB).

use crate::core::isa;
use crate::core::pipeline::latches::{ExMem, IdEx, IfId, MemWb};

/// Forwarding source selector. `11` never occurs — see [`ForwardSel::bits`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ForwardSel {
    /// `00`: no forwarding, use the value latched in ID/EX.
    #[default]
    None,
    /// `10`: forward from EX/MEM (the previous cycle's EX result).
    ExMem,
    /// `01`: forward from MEM/WB.
    MemWb,
}

impl ForwardSel {
    /// The 2-bit encoding used in traces and the snapshot.
    pub fn bits(self) -> u8 {
        match self {
            ForwardSel::None => 0b00,
            ForwardSel::ExMem => 0b10,
            ForwardSel::MemWb => 0b01,
        }
    }
}

/// Detects the load-use stall: an instruction in ID/EX is a load whose
/// destination register is read by the instruction currently in IF/ID.
pub fn need_stall_load_use(id_ex: &IdEx, if_id: &IfId) -> bool {
    if !id_ex.ctrl.mem_read {
        return false;
    }
    let decoded = isa::decode(if_id.instr);
    id_ex.rt == decoded.rs || id_ex.rt == decoded.rt
}

/// Computes `forwardA`, the selector for ID/EX's `rs` operand.
pub fn forward_a(id_ex: &IdEx, ex_mem: &ExMem, mem_wb: &MemWb) -> ForwardSel {
    forward_selector(id_ex.rs, ex_mem, mem_wb)
}

/// Computes `forwardB`, the selector for ID/EX's `rt` operand.
pub fn forward_b(id_ex: &IdEx, ex_mem: &ExMem, mem_wb: &MemWb) -> ForwardSel {
    forward_selector(id_ex.rt, ex_mem, mem_wb)
}

/// Shared forwarding logic for a single source register index: EX/MEM
/// takes priority over MEM/WB, and a destination of `0` never forwards.
fn forward_selector(src: u8, ex_mem: &ExMem, mem_wb: &MemWb) -> ForwardSel {
    if ex_mem.ctrl.reg_write && ex_mem.dest != 0 && ex_mem.dest == src {
        ForwardSel::ExMem
    } else if mem_wb.ctrl.reg_write && mem_wb.dest != 0 && mem_wb.dest == src {
        ForwardSel::MemWb
    } else {
        ForwardSel::None
    }
}

/// Resolves `forwardA`/`forwardB` into concrete operand values for the EX
/// stage, given the candidate sources. `wb_data` is the value the WB stage
/// is writing back this same cycle.
pub fn resolve(
    sel: ForwardSel,
    ex_mem_alu_result: i16,
    wb_data: i16,
    latched: i16,
    trace: bool,
    label: &str,
) -> i16 {
    let value = match sel {
        ForwardSel::None => latched,
        ForwardSel::ExMem => ex_mem_alu_result,
        ForwardSel::MemWb => wb_data,
    };
    if trace && sel != ForwardSel::None {
        eprintln!("[Forward] {label} <- {sel:?} value={value}");
    }
    value
}
