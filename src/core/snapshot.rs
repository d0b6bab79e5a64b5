//! Read-only snapshot of engine state.
//!
//! `Snapshot::capture` is the only way to observe an [`Engine`]; it borrows
//! the engine just long enough to copy out a plain, serializable value and
//! never mutates anything.

use serde::Serialize;

use crate::asm::disassemble;
use crate::core::engine::Engine;
use crate::core::isa;
use crate::core::pipeline::hazards::ForwardSel;
use crate::core::pipeline::latches::{ExMem, IdEx, IfId, MemWb};
use crate::core::pipeline::signals::ControlSignals;

/// Decoded view of the IF/ID latch, included in the snapshot so a client
/// does not need to re-decode the raw instruction word itself.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
pub struct DecodedInstr {
    pub op: u8,
    pub rs: u8,
    pub rt: u8,
    pub rd: u8,
    pub func: u8,
    pub imm: i16,
}

/// Snapshot of the IF/ID latch.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct IfIdView {
    pub pc_plus_1: u8,
    pub instr: u16,
    pub decoded: DecodedInstr,
}

/// Snapshot of the ID/EX latch.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct IdExView {
    pub pc: u8,
    pub rs_val: i16,
    pub rt_val: i16,
    pub imm: i16,
    pub rs: u8,
    pub rt: u8,
    pub dest: u8,
    pub ctrl: ControlSignals,
}

/// Snapshot of the EX/MEM latch.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct ExMemView {
    pub branch_target: u8,
    pub zero: bool,
    pub alu_result: i16,
    pub store_data: i16,
    pub dest: u8,
    pub ctrl: ControlSignals,
}

/// Snapshot of the MEM/WB latch.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct MemWbView {
    pub mem_data: i16,
    pub alu_result: i16,
    pub dest: u8,
    pub ctrl: ControlSignals,
}

/// Hazard and forwarding signals as observed on the most recently
/// completed tick.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct HazardView {
    pub stall: bool,
    pub pc_src: bool,
    /// 2-bit selector: `0b00` none, `0b10` EX/MEM, `0b01` MEM/WB.
    pub forward_a: u8,
    pub forward_b: u8,
}

/// Disassembled mnemonic currently resident in each pipeline stage, or
/// `"bubble"`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PipelineOccupancy {
    #[serde(rename = "IF")]
    pub if_stage: String,
    #[serde(rename = "ID")]
    pub id_stage: String,
    #[serde(rename = "EX")]
    pub ex_stage: String,
    #[serde(rename = "MEM")]
    pub mem_stage: String,
    #[serde(rename = "WB")]
    pub wb_stage: String,
}

/// A full, plain-data snapshot of engine state, suitable for JSON
/// serialization and external visualization.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Snapshot {
    pub cycle: u64,
    pub pc: u8,
    pub registers: [i16; 8],
    pub memory: Vec<(u8, i16)>,
    pub if_id: IfIdView,
    pub id_ex: IdExView,
    pub ex_mem: ExMemView,
    pub mem_wb: MemWbView,
    pub hazard: HazardView,
    pub pipeline_occupancy: PipelineOccupancy,
}

impl Snapshot {
    /// Captures a complete snapshot of `engine`'s current state.
    pub fn capture(engine: &Engine) -> Self {
        let (stall, pc_src, forward_a, forward_b) = engine.last_hazards();

        let if_id = view_if_id(engine.if_id());
        let id_ex = view_id_ex(engine.id_ex());
        let ex_mem = view_ex_mem(engine.ex_mem());
        let mem_wb = view_mem_wb(engine.mem_wb());

        Snapshot {
            cycle: engine.cycle_count(),
            pc: engine.pc(),
            registers: engine.regfile().snapshot(),
            memory: engine.dmem().non_zero(),
            if_id,
            id_ex,
            ex_mem,
            mem_wb,
            hazard: HazardView {
                stall,
                pc_src,
                forward_a: forward_a.bits(),
                forward_b: forward_b.bits(),
            },
            pipeline_occupancy: occupancy(engine),
        }
    }
}

fn view_if_id(latch: &IfId) -> IfIdView {
    let decoded = isa::decode(latch.instr);
    IfIdView {
        pc_plus_1: latch.pc_plus_1,
        instr: latch.instr,
        decoded: DecodedInstr {
            op: decoded.op,
            rs: decoded.rs,
            rt: decoded.rt,
            rd: decoded.rd,
            func: decoded.func,
            imm: decoded.imm,
        },
    }
}

fn view_id_ex(latch: &IdEx) -> IdExView {
    IdExView {
        pc: latch.pc,
        rs_val: latch.rs_val,
        rt_val: latch.rt_val,
        imm: latch.imm,
        rs: latch.rs,
        rt: latch.rt,
        dest: latch.dest,
        ctrl: latch.ctrl,
    }
}

fn view_ex_mem(latch: &ExMem) -> ExMemView {
    ExMemView {
        branch_target: latch.branch_target,
        zero: latch.zero,
        alu_result: latch.alu_result,
        store_data: latch.store_data,
        dest: latch.dest,
        ctrl: latch.ctrl,
    }
}

fn view_mem_wb(latch: &MemWb) -> MemWbView {
    MemWbView {
        mem_data: latch.mem_data,
        alu_result: latch.alu_result,
        dest: latch.dest,
        ctrl: latch.ctrl,
    }
}

/// `"bubble"` for any latch whose control bus is all zero, else its
/// disassembled mnemonic.
///
/// Each latch holds the instruction that just moved past the stage named
/// in the left column: IF/ID is what IF just fetched, ID/EX is what ID
/// just decoded, and so on. WB has no latch downstream of it, so its
/// occupancy comes from `Engine::last_retired`, the MEM/WB contents as
/// they stood at the start of this tick, before WB consumed them.
fn occupancy(engine: &Engine) -> PipelineOccupancy {
    let if_id = engine.if_id();
    let if_stage = if if_id.instr == 0 && if_id.pc_plus_1 == 0 {
        "bubble".to_string()
    } else {
        disassemble(if_id.instr)
    };

    let stage_of = |ctrl: &ControlSignals, label_word: u16| -> String {
        if ctrl.is_bubble() {
            "bubble".to_string()
        } else {
            disassemble(label_word)
        }
    };

    // Downstream latches no longer carry the raw instruction word, so the
    // occupancy string is reconstructed from the control/ALU-op fields
    // they do carry, which uniquely identify the instruction class.
    let id_stage = stage_of(&engine.id_ex().ctrl, reencode_id_ex(engine.id_ex()));
    let ex_stage = stage_of(&engine.ex_mem().ctrl, reencode_ex_mem(engine.ex_mem()));
    let mem_stage = stage_of(&engine.mem_wb().ctrl, reencode_mem_wb(engine.mem_wb()));
    let wb_stage = stage_of(&engine.last_retired().ctrl, reencode_mem_wb(engine.last_retired()));

    PipelineOccupancy {
        if_stage,
        id_stage,
        ex_stage,
        mem_stage,
        wb_stage,
    }
}

/// Reconstructs a representative instruction word for an ID/EX latch so
/// it can be run back through the disassembler for the occupancy string.
/// This is lossy for immediates beyond the 6-bit field (none exist, since
/// `imm` was sign-extended from exactly that field at decode time) but
/// exact for the opcode, registers, and function code that determine the
/// mnemonic.
fn reencode_id_ex(latch: &IdEx) -> u16 {
    let ctrl = &latch.ctrl;
    if ctrl.jump {
        let op = if ctrl.alu_src {
            isa::OP_JR
        } else if ctrl.reg_write {
            isa::OP_JAL
        } else {
            isa::OP_J
        };
        isa::encode_itype(op, 0, 0, latch.imm.clamp(-32, 31))
    } else if ctrl.branch {
        isa::encode_itype(isa::OP_BEQ, latch.rs, latch.rt, latch.imm.clamp(-32, 31))
    } else if ctrl.mem_read {
        isa::encode_itype(isa::OP_LW, latch.rs, latch.rt, latch.imm.clamp(-32, 31))
    } else if ctrl.mem_write {
        isa::encode_itype(isa::OP_SW, latch.rs, latch.rt, latch.imm.clamp(-32, 31))
    } else if ctrl.alu_src {
        isa::encode_itype(isa::OP_ADDI, latch.rs, latch.rt, latch.imm.clamp(-32, 31))
    } else {
        // R-type: recover `func` from the ALU op numbering, which is
        // shared with `func` by construction (signals::AluOp::from_func).
        isa::encode_rtype(latch.rs, latch.rt, latch.dest, alu_op_to_func(latch.alu_op))
    }
}

fn reencode_ex_mem(latch: &ExMem) -> u16 {
    let ctrl = &latch.ctrl;
    if ctrl.jump && ctrl.alu_src {
        isa::encode_itype(isa::OP_JR, 0, 0, 0)
    } else if ctrl.jump && ctrl.reg_write {
        isa::encode_itype(isa::OP_JAL, 0, 0, 0)
    } else if ctrl.jump {
        isa::encode_itype(isa::OP_J, 0, 0, 0)
    } else if ctrl.branch {
        isa::encode_itype(isa::OP_BEQ, 0, 0, 0)
    } else if ctrl.mem_read {
        isa::encode_itype(isa::OP_LW, 0, 0, 0)
    } else if ctrl.mem_write {
        isa::encode_itype(isa::OP_SW, 0, 0, 0)
    } else if ctrl.alu_src {
        isa::encode_itype(isa::OP_ADDI, 0, 0, 0)
    } else {
        isa::encode_rtype(0, 0, latch.dest, isa::FUNC_ADD)
    }
}

fn reencode_mem_wb(latch: &MemWb) -> u16 {
    let ctrl = &latch.ctrl;
    if ctrl.jump && ctrl.reg_write {
        isa::encode_itype(isa::OP_JAL, 0, 0, 0)
    } else if ctrl.mem_to_reg {
        isa::encode_itype(isa::OP_LW, 0, 0, 0)
    } else if ctrl.reg_write {
        isa::encode_rtype(0, 0, latch.dest, isa::FUNC_ADD)
    } else {
        0
    }
}

fn alu_op_to_func(op: crate::core::pipeline::signals::AluOp) -> u8 {
    use crate::core::pipeline::signals::AluOp;
    match op {
        AluOp::Add => isa::FUNC_ADD,
        AluOp::Sub => isa::FUNC_SUB,
        AluOp::And => isa::FUNC_AND,
        AluOp::Or => isa::FUNC_OR,
        AluOp::Xor => isa::FUNC_XOR,
        AluOp::Slt => isa::FUNC_SLT,
        AluOp::Div => isa::FUNC_DIV,
    }
}
