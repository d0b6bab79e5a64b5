//! The simulation engine: ties the register file, memories, and pipeline
//! together and drives one clock tick at a time.
//!
//! `Engine` owns every piece of architectural and microarchitectural state.
//! `tick()` evaluates the five stages in reverse order (WB, MEM, EX, ID, IF)
//! against a staging buffer of "next" latch values, then commits all of
//! them atomically, making the controller's parallel-hardware semantics explicit.

use crate::common::error::{AssemblyError, EngineError, ProgramTooLargeError};
use crate::core::memory::{DataMemory, InstrMemory, MEM_WORDS};
use crate::core::pipeline::hazards::{self, ForwardSel};
use crate::core::pipeline::latches::{ExMem, IdEx, IfId, MemWb};
use crate::core::pipeline::stages::{decode_stage, execute_stage, fetch_stage, mem_stage, wb_stage};
use crate::core::regfile::RegFile;
use crate::core::snapshot::Snapshot;

/// The cycle-accurate 5-stage pipelined processor core.
///
/// Pure: every observable change
/// happens inside [`Engine::tick`], [`Engine::load`], or [`Engine::reset`];
/// [`Engine::snapshot`] never mutates.
pub struct Engine {
    pc: u8,
    regfile: RegFile,
    imem: InstrMemory,
    dmem: DataMemory,
    cycle: u64,

    if_id: IfId,
    id_ex: IdEx,
    ex_mem: ExMem,
    mem_wb: MemWb,

    /// The MEM/WB latch as it stood at the start of the most recently
    /// completed tick, i.e. the instruction that retired through WB this
    /// cycle. Kept only so the snapshot can report WB-stage occupancy,
    /// since nothing downstream of WB holds it once the cycle commits.
    last_retired: MemWb,

    /// Hazard/forwarding signals observed on the most recently completed
    /// tick, retained only for the snapshot.
    last_stall: bool,
    last_pc_src: bool,
    last_forward_a: ForwardSel,
    last_forward_b: ForwardSel,

    /// Emits per-stage `eprintln!` trace lines when set.
    pub trace: bool,
}

impl Engine {
    /// Creates a new engine with every memory, register, and latch zeroed.
    pub fn new() -> Self {
        Self {
            pc: 0,
            regfile: RegFile::new(),
            imem: InstrMemory::new(),
            dmem: DataMemory::new(),
            cycle: 0,
            if_id: IfId::default(),
            id_ex: IdEx::default(),
            ex_mem: ExMem::default(),
            mem_wb: MemWb::default(),
            last_retired: MemWb::default(),
            last_stall: false,
            last_pc_src: false,
            last_forward_a: ForwardSel::default(),
            last_forward_b: ForwardSel::default(),
            trace: false,
        }
    }

    /// Loads a program into instruction memory.
    ///
    /// Zeros all architectural state (`PC`, register file, data memory,
    /// `cycle`), clears every latch to a bubble, and installs `program`
    /// starting at instruction-memory index 0. There is no partial load:
    /// either every word is installed, or `program` is rejected and the
    /// engine's prior state is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ProgramTooLargeError`] if `program.len() > 256`.
    pub fn load(&mut self, program: &[u16]) -> Result<(), ProgramTooLargeError> {
        if program.len() > MEM_WORDS {
            return Err(ProgramTooLargeError {
                word_count: program.len(),
            });
        }
        self.imem.load(program);
        self.reset();
        Ok(())
    }

    /// Clears `PC`, the register file, data memory, `cycle`, and every
    /// pipeline latch to a bubble, leaving instruction memory intact.
    ///
    /// `reset(); reset();` is idempotent: the observable state after either
    /// call is identical.
    pub fn reset(&mut self) {
        self.pc = 0;
        self.regfile.reset();
        self.dmem.reset();
        self.cycle = 0;
        self.if_id = IfId::default();
        self.id_ex = IdEx::default();
        self.ex_mem = ExMem::default();
        self.mem_wb = MemWb::default();
        self.last_retired = MemWb::default();
        self.last_stall = false;
        self.last_pc_src = false;
        self.last_forward_a = ForwardSel::default();
        self.last_forward_b = ForwardSel::default();
    }

    /// Advances the machine by exactly one clock cycle.
    ///
    /// Evaluates WB, then MEM, then EX, then ID, then IF, writing every
    /// stage's output into a staging buffer so that no stage observes
    /// another stage's output from the same tick; all staged values are
    /// then committed together. `tick()` cannot fail: division by zero,
    /// PC wraparound, and out-of-range addresses are all defined behavior.
    pub fn tick(&mut self) {
        // Captured before WB consumes it, purely so the snapshot can
        // report what retired through WB this cycle.
        let retiring = self.mem_wb;

        // WB reads MEM/WB and mutates the register file directly; its
        // result is also this cycle's same-cycle bypass source for ID.
        let wb_bypass = wb_stage(&self.mem_wb, &mut self.regfile);

        // MEM reads EX/MEM and mutates data memory directly.
        let mem_wb_next = mem_stage(&self.ex_mem, &mut self.dmem);

        // EX reads ID/EX, forwarding from the *current* (pre-commit)
        // EX/MEM and MEM/WB latches, which are exactly one and two stages
        // ahead respectively.
        let exec = execute_stage(&self.id_ex, &self.ex_mem, &self.mem_wb, self.trace);

        // ID reads IF/ID and the register file, bypassing the WB value
        // computed above, and is flushed to a bubble if EX just signaled
        // a control hazard.
        let stall = hazards::need_stall_load_use(&self.id_ex, &self.if_id);
        let decode = decode_stage(&self.if_id, &self.regfile, wb_bypass, exec.pc_src);
        let id_ex_next = if stall {
            IdEx::default()
        } else {
            decode.id_ex_next
        };

        // IF reads PC and instruction memory, held by a stall and
        // overridden by a control-hazard flush from EX.
        let fetch = fetch_stage(
            self.pc,
            &self.imem,
            &self.if_id,
            stall,
            exec.pc_src,
            exec.pc_src_target,
        );

        if self.trace {
            self.trace_stage("WB", &self.mem_wb);
            self.trace_stage("MEM", &self.ex_mem);
            self.trace_stage("EX", &self.id_ex);
            self.trace_stage("ID", &self.if_id);
            if stall {
                eprintln!("[IF] stall");
            }
            if exec.pc_src {
                eprintln!("[EX] pc_src -> {:#04x}", exec.pc_src_target);
            }
        }

        // Commit: every "-next" value lands at once from the staging
        // buffer, and flush-wins-over-stall is structural here since
        // `exec.pc_src` gates both the IF/ID and ID/EX overrides above.
        self.mem_wb = mem_wb_next;
        self.ex_mem = exec.ex_mem_next;
        self.id_ex = id_ex_next;
        self.if_id = fetch.if_id_next;
        self.pc = fetch.pc_next;
        self.cycle += 1;

        self.last_retired = retiring;
        self.last_stall = stall;
        self.last_pc_src = exec.pc_src;
        self.last_forward_a = exec.forward_a;
        self.last_forward_b = exec.forward_b;
    }

    fn trace_stage<T: std::fmt::Debug>(&self, name: &str, latch: &T) {
        eprintln!("[{name}] {latch:?}");
    }

    /// Returns a read-only snapshot of the full engine state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    /// Current program counter (0..=255).
    pub fn pc(&self) -> u8 {
        self.pc
    }

    /// Current cycle counter, monotonically increasing since the last
    /// `load`/`reset`.
    pub fn cycle_count(&self) -> u64 {
        self.cycle
    }

    pub(crate) fn regfile(&self) -> &RegFile {
        &self.regfile
    }

    pub(crate) fn imem(&self) -> &InstrMemory {
        &self.imem
    }

    pub(crate) fn dmem(&self) -> &DataMemory {
        &self.dmem
    }

    pub(crate) fn if_id(&self) -> &IfId {
        &self.if_id
    }

    pub(crate) fn id_ex(&self) -> &IdEx {
        &self.id_ex
    }

    pub(crate) fn ex_mem(&self) -> &ExMem {
        &self.ex_mem
    }

    pub(crate) fn mem_wb(&self) -> &MemWb {
        &self.mem_wb
    }

    pub(crate) fn last_retired(&self) -> &MemWb {
        &self.last_retired
    }

    pub(crate) fn last_hazards(&self) -> (bool, bool, ForwardSel, ForwardSel) {
        (
            self.last_stall,
            self.last_pc_src,
            self.last_forward_a,
            self.last_forward_b,
        )
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Assembles `text` into a sequence of 16-bit instruction words.
///
/// A thin re-export of [`crate::asm::assemble`] kept alongside the engine
/// API table alongside the engine.
pub fn assemble(text: &str) -> Result<Vec<u16>, AssemblyError> {
    crate::asm::assemble(text)
}

/// Disassembles a single 16-bit instruction word.
pub fn disassemble(word: u16) -> String {
    crate::asm::disassemble(word)
}

/// Assembles `text` and loads the result into `engine` in one step,
/// surfacing either error variant `load`/`assemble` could produce.
pub fn assemble_and_load(engine: &mut Engine, text: &str) -> Result<(), EngineError> {
    let words = assemble(text)?;
    engine.load(&words)?;
    Ok(())
}
