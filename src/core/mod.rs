//! Engine core: register file, memories, ALU, ISA tables, and the
//! five-stage pipeline.

/// Instruction word layout and opcode/function encodings.
pub mod isa;

/// General-purpose register file.
pub mod regfile;

/// Instruction and data memories.
pub mod memory;

/// Execution units (ALU).
pub mod units;

/// Pipeline latches, hazard/forwarding unit, control signals, and stages.
pub mod pipeline;

/// The simulation engine tying every component together.
pub mod engine;

/// Read-only snapshot of engine state.
pub mod snapshot;

pub use engine::Engine;
pub use snapshot::Snapshot;
