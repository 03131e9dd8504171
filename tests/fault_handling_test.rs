/// The fault register is sticky and never halting: a bad field records a
/// code, execution continues, and a later fault overwrites the earlier
/// one. These tests drive whole programs across fault boundaries.
use halfword::config::InterpreterConfig;
use halfword::interpreter::Interpreter;
use halfword::machine::{Fault, Machine};
use halfword::output::BufferSink;
use halfword::program::Program;

fn word(major: u16, operand: u16) -> u16 {
    (major << 12) | (operand & 0x0FFF)
}

fn run_program(words: Vec<u16>) -> (Interpreter, BufferSink) {
    let mut machine = Machine::new();
    machine.load(&Program::from_words(words).unwrap());
    let sink = BufferSink::new();
    let mut interp = Interpreter::with_output(
        machine,
        InterpreterConfig::default(),
        Box::new(sink.clone()),
    );
    interp.run().unwrap();
    (interp, sink)
}

#[test]
fn test_execution_continues_after_fault() {
    // The illegal ARITH minor collapses [5, 2] to [5] and records a
    // fault; the program then computes 1 + 5 as if nothing happened.
    let (interp, _sink) = run_program(vec![
        word(0x0, 5),     // PUSH 5
        word(0x0, 2),     // PUSH 2
        word(0x3, 0xFFF), // ARITH with no such minor opcode
        word(0x0, 1),     // PUSH 1
        word(0x3, 0),     // ARITH ADD
        word(0x9, 0),     // HALT
    ]);

    assert_eq!(interp.machine.stack_contents(), &[6]);
    assert_eq!(interp.machine.fault, Fault::IllegalParameter);
    assert!(interp.machine.halted);
}

#[test]
fn test_later_fault_overwrites_earlier_one() {
    let (interp, _sink) = run_program(vec![
        word(0x0, 5),
        word(0x0, 2),
        word(0x3, 0xFFF), // ILLEGAL_PARAMETER
        word(0x0, 7),
        word(0x6, 6),     // STORER Rerr: REGISTER_ACCESS_DENIED
        word(0x9, 0),
    ]);

    assert_eq!(interp.machine.fault, Fault::RegisterAccessDenied);
    // The denied store must not have popped its operand
    assert_eq!(interp.machine.stack_contents(), &[5, 7]);
}

#[test]
fn test_fault_register_is_loadable_mid_run() {
    // Trip a fault, then LOADR Rerr pushes its numeric code for printing
    let (interp, sink) = run_program(vec![
        word(0x0, 1),
        word(0x4, 0x123), // LOGIC with no such minor opcode
        word(0x7, 6),     // LOADR Rerr
        word(0x8, 0x000), // IO PRINT/INTEGER
        word(0x9, 0),
    ]);

    assert_eq!(sink.contents(), "1"); // ILLEGAL_PARAMETER code
    assert_eq!(interp.machine.fault, Fault::IllegalParameter);
}

#[test]
fn test_unknown_io_category_leaves_stream_clean() {
    let (interp, sink) = run_program(vec![
        word(0x0, 42),
        word(0x8, 0x3C0), // IO with category 0x0F
        word(0x8, 0x000), // IO PRINT/INTEGER still works afterwards
        word(0x9, 0),
    ]);

    assert_eq!(sink.contents(), "42");
    assert_eq!(interp.machine.fault, Fault::IllegalParameter);
}

#[test]
fn test_denied_store_targets_never_mutate_state() {
    for index in [5_u16, 6, 7, 0x3FF] {
        let (interp, _sink) = run_program(vec![
            word(0x0, 0x0AA),
            word(0x6, index),
            word(0x9, 0),
        ]);

        assert_eq!(interp.machine.fault, Fault::RegisterAccessDenied);
        assert_eq!(interp.machine.stack_contents(), &[0x0AA]);
        assert_eq!(interp.machine.registers, Default::default());
    }
}
