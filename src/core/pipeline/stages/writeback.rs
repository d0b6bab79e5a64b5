//! Writeback (WB) stage.
//!
//! Selects the final writeback value and commits it to the register file.
//! Also hands back `(dest, wb_data)` so the ID stage can splice in the
//! same-cycle bypass.

use crate::core::pipeline::latches::MemWb;
use crate::core::regfile::RegFile;

/// Evaluates the writeback stage, mutating `regfile` directly.
///
/// # Returns
///
/// `Some((dest, wb_data))` if a non-zero register was written this cycle,
/// for the ID stage's same-cycle bypass; `None` otherwise.
pub fn wb_stage(mem_wb: &MemWb, regfile: &mut RegFile) -> Option<(u8, i16)> {
    let wb_data = mem_wb.wb_data();
    if mem_wb.ctrl.reg_write && mem_wb.dest != 0 {
        regfile.write(mem_wb.dest, wb_data);
        Some((mem_wb.dest, wb_data))
    } else {
        None
    }
}
