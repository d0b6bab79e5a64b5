//! End-to-end pipeline scenarios.
//!
//! Each test assembles a short program, loads it, ticks the engine until
//! the program has drained through all five stages, and checks the
//! resulting architectural state.

use pipeline_sim::asm::assemble;
use pipeline_sim::core::Engine;

/// Loads `src` into a fresh engine and returns it.
fn engine_with(src: &str) -> Engine {
    let words = assemble(src).expect("valid program");
    let mut engine = Engine::new();
    engine.load(&words).expect("program fits in memory");
    engine
}

/// Ticks `engine` `n` times.
fn run(engine: &mut Engine, n: u64) {
    for _ in 0..n {
        engine.tick();
    }
}

/// Scenario 1: back-to-back dependent adds are resolved purely by
/// forwarding, with no stall.
#[test]
fn test_forwarding_no_stall() {
    let mut engine = engine_with(
        "addi r1, r0, 10\n\
         add r2, r1, r1\n\
         add r3, r2, r1\n",
    );
    run(&mut engine, 7);
    let regs = engine.snapshot().registers;
    assert_eq!(regs[1], 10);
    assert_eq!(regs[2], 20);
    assert_eq!(regs[3], 30);
}

/// Scenario 2: a load immediately consumed by the next instruction stalls
/// exactly once.
#[test]
fn test_load_use_stall() {
    let mut engine = engine_with(
        "addi r1, r0, 5\n\
         sw r1, 0(r0)\n\
         lw r2, 0(r0)\n\
         add r3, r2, r1\n",
    );
    let mut stalls = 0;
    for _ in 0..10 {
        engine.tick();
        if engine.snapshot().hazard.stall {
            stalls += 1;
        }
    }
    assert_eq!(stalls, 1);
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.registers[3], 10);
    assert_eq!(
        snapshot
            .memory
            .iter()
            .find(|(addr, _)| *addr == 0)
            .map(|(_, v)| *v),
        Some(5)
    );
}

/// Scenario 3: a taken branch flushes the two instructions fetched behind
/// it.
#[test]
fn test_branch_taken_flushes_two() {
    let mut engine = engine_with(
        "addi r1, r0, 5\n\
         addi r2, r0, 5\n\
         beq r1, r2, 2\n\
         addi r3, r0, 99\n\
         addi r4, r0, 88\n\
         addi r5, r0, 42\n",
    );
    run(&mut engine, 12);
    let regs = engine.snapshot().registers;
    assert_eq!(regs[3], 0);
    assert_eq!(regs[4], 0);
    assert_eq!(regs[5], 42);
}

/// Scenario 4: an unconditional jump skips the instructions in its
/// shadow.
#[test]
fn test_jump() {
    let mut engine = engine_with(
        "j 3\n\
         addi r6, r0, 77\n\
         addi r7, r0, 66\n\
         addi r1, r0, 1\n",
    );
    run(&mut engine, 10);
    let regs = engine.snapshot().registers;
    assert_eq!(regs[6], 0);
    assert_eq!(regs[7], 0);
    assert_eq!(regs[1], 1);
}

/// Scenario 5: `jal`/`jr` round-trip through a return address stored in
/// `r7`.
#[test]
fn test_jal_jr_round_trip() {
    let mut engine = engine_with(
        "addi r1, r0, 5\n\
         jal 2\n\
         addi r2, r0, 10\n\
         j 3\n\
         add r1, r1, r1\n\
         jr r7\n",
    );
    run(&mut engine, 16);
    let regs = engine.snapshot().registers;
    assert_eq!(regs[1], 10);
    assert_eq!(regs[2], 10);
    assert_eq!(regs[7], 2);
}

/// Scenario 6: dividing by zero never faults and yields zero.
#[test]
fn test_division_by_zero_is_safe() {
    let mut engine = engine_with(
        "addi r1, r0, 7\n\
         div r2, r1, r0\n",
    );
    run(&mut engine, 6);
    assert_eq!(engine.snapshot().registers[2], 0);
}

/// Scenario 7: an 8-term Fibonacci program leaves the expected sequence
/// in data memory.
#[test]
fn test_fibonacci_eight_terms() {
    let src = "\
        addi r1, r0, 0    # F(0)
        addi r2, r0, 1    # F(1)
        sw r1, 0(r0)
        sw r2, 1(r0)
        addi r3, r0, 2    # index
        addi r4, r0, 8    # count
        add r5, r1, r2    # F(2) = F(0)+F(1)
        sw r5, 2(r0)
        add r1, r2, r0
        add r2, r5, r0
        add r5, r1, r2    # F(3)
        sw r5, 3(r0)
        add r1, r2, r0
        add r2, r5, r0
        add r5, r1, r2    # F(4)
        sw r5, 4(r0)
        add r1, r2, r0
        add r2, r5, r0
        add r5, r1, r2    # F(5)
        sw r5, 5(r0)
        add r1, r2, r0
        add r2, r5, r0
        add r5, r1, r2    # F(6)
        sw r5, 6(r0)
        add r1, r2, r0
        add r2, r5, r0
        add r5, r1, r2    # F(7)
        sw r5, 7(r0)
        halt
    ";
    let mut engine = engine_with(src);
    run(&mut engine, 60);
    let snapshot = engine.snapshot();
    let mem = |addr: u8| -> i16 {
        snapshot
            .memory
            .iter()
            .find(|(a, _)| *a == addr)
            .map(|(_, v)| *v)
            .unwrap_or(0)
    };
    assert_eq!(
        [
            mem(0),
            mem(1),
            mem(2),
            mem(3),
            mem(4),
            mem(5),
            mem(6),
            mem(7)
        ],
        [0, 1, 1, 2, 3, 5, 8, 13]
    );
}

/// `r0` is always zero, and `PC` always stays in range.
#[test]
fn test_invariants_hold_every_tick() {
    let mut engine = engine_with(
        "addi r1, r0, 5\n\
         jal 2\n\
         addi r2, r0, 10\n\
         j 3\n\
         add r1, r1, r1\n\
         jr r7\n",
    );
    for _ in 0..20 {
        engine.tick();
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.registers[0], 0);
        assert!(snapshot.pc <= 255);
        assert!(matches!(snapshot.hazard.forward_a, 0b00 | 0b01 | 0b10));
        assert!(matches!(snapshot.hazard.forward_b, 0b00 | 0b01 | 0b10));
    }
}

/// `reset()` is idempotent.
#[test]
fn test_reset_idempotent() {
    let mut engine = engine_with("addi r1, r0, 5\nadd r2, r1, r1\n");
    run(&mut engine, 5);
    engine.reset();
    let after_one = engine.snapshot();
    engine.reset();
    let after_two = engine.snapshot();
    assert_eq!(after_one.cycle, after_two.cycle);
    assert_eq!(after_one.pc, after_two.pc);
    assert_eq!(after_one.registers, after_two.registers);
    assert_eq!(after_one.memory, after_two.memory);
}

/// `load()` rejects programs larger than 256 words and leaves prior state
/// untouched.
#[test]
fn test_load_rejects_oversized_program() {
    let mut engine = engine_with("addi r1, r0, 1\n");
    run(&mut engine, 3);
    let before = engine.snapshot();

    let oversized = vec![0u16; 257];
    let err = engine.load(&oversized).unwrap_err();
    assert_eq!(err.word_count, 257);

    let after = engine.snapshot();
    assert_eq!(before.pc, after.pc);
    assert_eq!(before.registers, after.registers);
}
