//! Tests for the hazard-detection and forwarding unit.

use pipeline_sim::core::pipeline::hazards::{self, ForwardSel};
use pipeline_sim::core::pipeline::latches::{ExMem, IdEx, IfId, MemWb};
use pipeline_sim::core::pipeline::signals::ControlSignals;

fn id_ex_reading(rs: u8, rt: u8) -> IdEx {
    IdEx {
        rs,
        rt,
        ..Default::default()
    }
}

fn ex_mem_writing(dest: u8) -> ExMem {
    ExMem {
        dest,
        ctrl: ControlSignals {
            reg_write: true,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn mem_wb_writing(dest: u8) -> MemWb {
    MemWb {
        dest,
        ctrl: ControlSignals {
            reg_write: true,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// EX/MEM takes priority and forwards into the `rs` operand.
#[test]
fn test_forward_a_from_ex_mem() {
    let id_ex = id_ex_reading(2, 0);
    let ex_mem = ex_mem_writing(2);
    let mem_wb = MemWb::default();
    assert_eq!(hazards::forward_a(&id_ex, &ex_mem, &mem_wb), ForwardSel::ExMem);
}

/// MEM/WB forwards only when EX/MEM does not also target the register.
#[test]
fn test_forward_b_from_mem_wb() {
    let id_ex = id_ex_reading(0, 3);
    let ex_mem = ExMem::default();
    let mem_wb = mem_wb_writing(3);
    assert_eq!(hazards::forward_b(&id_ex, &ex_mem, &mem_wb), ForwardSel::MemWb);
}

/// EX/MEM wins over MEM/WB when both target the same register.
#[test]
fn test_forward_ex_mem_priority_over_mem_wb() {
    let id_ex = id_ex_reading(5, 0);
    let ex_mem = ex_mem_writing(5);
    let mem_wb = mem_wb_writing(5);
    assert_eq!(hazards::forward_a(&id_ex, &ex_mem, &mem_wb), ForwardSel::ExMem);
}

/// Writes to `r0` never count as a forwarding source.
#[test]
fn test_forward_excludes_r0() {
    let id_ex = id_ex_reading(0, 0);
    let ex_mem = ex_mem_writing(0);
    let mem_wb = mem_wb_writing(0);
    assert_eq!(hazards::forward_a(&id_ex, &ex_mem, &mem_wb), ForwardSel::None);
    assert_eq!(hazards::forward_b(&id_ex, &ex_mem, &mem_wb), ForwardSel::None);
}

/// `RegWrite = 0` never forwards, even with a matching destination.
#[test]
fn test_forward_requires_reg_write() {
    let id_ex = id_ex_reading(4, 0);
    let ex_mem = ExMem {
        dest: 4,
        ctrl: ControlSignals::default(),
        ..Default::default()
    };
    let mem_wb = MemWb::default();
    assert_eq!(hazards::forward_a(&id_ex, &ex_mem, &mem_wb), ForwardSel::None);
}

/// A load whose destination feeds the immediately following instruction's
/// source register is the textbook load-use stall.
#[test]
fn test_load_use_stall_detected() {
    let id_ex = IdEx {
        rt: 2,
        ctrl: ControlSignals {
            mem_read: true,
            ..Default::default()
        },
        ..Default::default()
    };
    let if_id = IfId {
        instr: pipeline_sim::core::isa::encode_rtype(2, 0, 3, pipeline_sim::core::isa::FUNC_ADD),
        ..Default::default()
    };
    assert!(hazards::need_stall_load_use(&id_ex, &if_id));
}

/// No stall when the load's destination is not consumed next.
#[test]
fn test_load_use_no_stall_when_unrelated() {
    let id_ex = IdEx {
        rt: 2,
        ctrl: ControlSignals {
            mem_read: true,
            ..Default::default()
        },
        ..Default::default()
    };
    let if_id = IfId {
        instr: pipeline_sim::core::isa::encode_rtype(4, 5, 3, pipeline_sim::core::isa::FUNC_ADD),
        ..Default::default()
    };
    assert!(!hazards::need_stall_load_use(&id_ex, &if_id));
}

/// A non-load in ID/EX can never trigger a load-use stall.
#[test]
fn test_no_stall_without_mem_read() {
    let id_ex = IdEx {
        rt: 2,
        ctrl: ControlSignals::default(),
        ..Default::default()
    };
    let if_id = IfId {
        instr: pipeline_sim::core::isa::encode_rtype(2, 0, 3, pipeline_sim::core::isa::FUNC_ADD),
        ..Default::default()
    };
    assert!(!hazards::need_stall_load_use(&id_ex, &if_id));
}
