//! Simulation statistics collection and reporting.
//!
//! Not part of the pure core: the engine itself tracks only `cycle`.
//! `SimStats` is an ambient concern of the CLI driver, deriving counters
//! from each tick's [`crate::core::Snapshot`] rather than from the engine
//! directly.

use std::time::Instant;

use crate::core::Snapshot;

/// Running counters derived from a sequence of snapshots.
pub struct SimStats {
    start_time: Instant,
    pub cycles: u64,
    pub instructions_retired: u64,

    pub stalls: u64,
    pub flushes: u64,

    pub loads: u64,
    pub stores: u64,
    pub branches_taken: u64,
    pub branches_not_taken: u64,
    pub jumps: u64,
}

impl SimStats {
    /// Creates an empty counter set, with the wall-clock timer started now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_retired: 0,
            stalls: 0,
            flushes: 0,
            loads: 0,
            stores: 0,
            branches_taken: 0,
            branches_not_taken: 0,
            jumps: 0,
        }
    }

    /// Folds one tick's snapshot into the running counters.
    ///
    /// Retirement, load/store, and branch outcome are all read off the
    /// EX/MEM and hazard fields of `snapshot`, since those describe the
    /// instruction that just moved past EX this same cycle.
    pub fn observe(&mut self, snapshot: &Snapshot) {
        self.cycles = snapshot.cycle;

        if snapshot.hazard.stall {
            self.stalls += 1;
        }
        if snapshot.hazard.pc_src {
            self.flushes += 1;
        }
        if snapshot.pipeline_occupancy.wb_stage != "bubble" {
            self.instructions_retired += 1;
        }

        let ex_mem_ctrl = &snapshot.ex_mem.ctrl;
        if ex_mem_ctrl.mem_read {
            self.loads += 1;
        }
        if ex_mem_ctrl.mem_write {
            self.stores += 1;
        }
        if ex_mem_ctrl.branch {
            if snapshot.hazard.pc_src {
                self.branches_taken += 1;
            } else {
                self.branches_not_taken += 1;
            }
        }
        if ex_mem_ctrl.jump {
            self.jumps += 1;
        }
    }

    /// Prints a formatted summary of all collected statistics.
    pub fn print(&self) {
        let seconds = self.start_time.elapsed().as_secs_f64();
        let cyc = self.cycles.max(1);
        let instr = self.instructions_retired.max(1);

        let ipc = self.instructions_retired as f64 / cyc as f64;
        let cpi = cyc as f64 / instr as f64;
        let khz = (self.cycles as f64 / seconds) / 1000.0;

        println!("\n==========================================================");
        println!("PIPELINE SIMULATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {:.4} s", seconds);
        println!("sim_cycles               {}", self.cycles);
        println!("sim_freq                 {:.2} kHz", khz);
        println!("sim_insts_retired        {}", self.instructions_retired);
        println!("sim_ipc                  {:.4}", ipc);
        println!("sim_cpi                  {:.4}", cpi);
        println!("----------------------------------------------------------");
        println!("HAZARDS");
        println!(
            "  stalls                 {} ({:.2}%)",
            self.stalls,
            (self.stalls as f64 / cyc as f64) * 100.0
        );
        println!(
            "  flushes                {} ({:.2}%)",
            self.flushes,
            (self.flushes as f64 / cyc as f64) * 100.0
        );
        println!("----------------------------------------------------------");
        println!("INSTRUCTION MIX");
        println!("  loads                  {}", self.loads);
        println!("  stores                 {}", self.stores);
        println!("  branches_taken         {}", self.branches_taken);
        println!("  branches_not_taken     {}", self.branches_not_taken);
        println!("  jumps                  {}", self.jumps);
        println!("==========================================================");
    }
}

impl Default for SimStats {
    fn default() -> Self {
        Self::new()
    }
}
