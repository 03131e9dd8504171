use crate::config::InterpreterConfig;
use crate::instruction::{Instruction, Opcode};
use crate::machine::{Fault, Machine, CODE_BASE_INDEX, MEM_CELL_COUNT};
use crate::output::{OutputSink, StdoutSink};
use log::{debug, info};

/// The execution engine: owns the machine state, the configuration, and
/// the output sink, and drives the fetch/decode/dispatch loop.
///
/// Faults recorded by handlers never stop the loop; the only termination
/// conditions are the halt flag and the out-of-code-bounds check. Host
/// errors (`Err` returns) are a different layer entirely: they indicate a
/// misbehaving program abusing the stack, and abort the run without
/// touching the fault register.
pub struct Interpreter {
    /// The machine state
    pub machine: Machine,
    /// Interpreter behavior switches
    pub config: InterpreterConfig,
    pub(crate) output: Box<dyn OutputSink>,
    /// Instructions executed so far
    instruction_count: u64,
}

impl Interpreter {
    /// Create an interpreter writing to standard output
    pub fn new(machine: Machine) -> Self {
        Interpreter::with_output(machine, InterpreterConfig::default(), Box::new(StdoutSink))
    }

    /// Create an interpreter with an explicit configuration and sink
    pub fn with_output(
        machine: Machine,
        config: InterpreterConfig,
        output: Box<dyn OutputSink>,
    ) -> Self {
        Interpreter {
            machine,
            config,
            output,
            instruction_count: 0,
        }
    }

    /// Number of instructions executed so far
    pub fn instruction_count(&self) -> u64 {
        self.instruction_count
    }

    /// Execute the instruction at IP, advance IP, and apply the
    /// out-of-code-bounds auto-halt. No-op once the machine has halted.
    pub fn step(&mut self) -> Result<(), String> {
        if self.machine.halted {
            return Ok(());
        }

        let word = self.machine.code_word(CODE_BASE_INDEX + self.machine.ip)?;
        let inst = Instruction::decode(word);
        debug!(
            "IP {:3}: {} (stack depth {})",
            self.machine.ip, inst, self.machine.sp
        );

        match inst.opcode {
            // Stack primitives live in the dispatch itself; everything else
            // routes to a handler for its instruction family.
            Opcode::Push => self.machine.push(inst.operand)?,
            Opcode::Pop => {
                let value = self.machine.pop()?;
                self.machine.registers.a = value;
            }
            Opcode::Dup => {
                let top = self.machine.peek()?;
                self.machine.push(top)?;
            }
            Opcode::Arith => self.execute_arith(&inst)?,
            Opcode::Logic => self.execute_logic(&inst)?,
            Opcode::BShift => self.execute_shift(&inst)?,
            Opcode::StoreR => self.execute_store(&inst)?,
            Opcode::LoadR => self.execute_load(&inst)?,
            Opcode::Io => self.execute_io(&inst)?,
            Opcode::Halt => {
                debug!("HALT at IP {}", self.machine.ip);
                self.machine.halted = true;
            }
            Opcode::Unknown(major) => {
                // No instruction is assigned to this major value; record the
                // fault and keep going, like every other bad field.
                debug!("Unknown major opcode {:x} at IP {}", major, self.machine.ip);
                self.machine.record_fault(Fault::IllegalParameter);
            }
        }

        self.instruction_count += 1;
        self.machine.ip += 1;
        if CODE_BASE_INDEX + self.machine.ip >= MEM_CELL_COUNT / 2 {
            debug!("IP {} reached the end of the code region", self.machine.ip);
            self.machine.halted = true;
        }

        Ok(())
    }

    /// Run until the halt flag is set
    pub fn run(&mut self) -> Result<(), String> {
        self.run_with_limit(self.config.max_instructions)
    }

    /// Run until the halt flag is set or the instruction ceiling is hit
    pub fn run_with_limit(&mut self, max_instructions: Option<u64>) -> Result<(), String> {
        info!("Starting execution at IP {}", self.machine.ip);
        let mut executed: u64 = 0;

        while !self.machine.halted {
            if let Some(limit) = max_instructions {
                if executed >= limit {
                    return Err(format!("Instruction limit of {limit} exceeded"));
                }
            }
            self.step()?;
            executed += 1;
        }

        info!(
            "Halted after {} instructions, fault: {:?}",
            executed, self.machine.fault
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::BufferSink;
    use crate::program::{Program, CODE_WORD_CAPACITY};

    fn word(major: u16, operand: u16) -> u16 {
        (major << 12) | (operand & 0x0FFF)
    }

    fn create_test_interpreter(words: Vec<u16>) -> Interpreter {
        let mut machine = Machine::new();
        machine.load(&Program::from_words(words).unwrap());
        Interpreter::with_output(
            machine,
            InterpreterConfig::default(),
            Box::new(BufferSink::new()),
        )
    }

    #[test]
    fn test_push_pop_dup() {
        // PUSH 5, PUSH 9, DUP, POP, HALT
        let mut interp = create_test_interpreter(vec![
            word(0x0, 5),
            word(0x0, 9),
            word(0x2, 0),
            word(0x1, 0),
            word(0x9, 0),
        ]);
        interp.run().unwrap();

        let snap = interp.machine.snapshot();
        assert_eq!(snap.stack, vec![5, 9]);
        assert_eq!(snap.registers.a, 9);
        assert!(snap.halted);
        assert_eq!(snap.fault, Fault::None);
    }

    #[test]
    fn test_halt_only_program() {
        let mut interp = create_test_interpreter(vec![word(0x9, 0)]);
        interp.run().unwrap();

        assert!(interp.machine.halted);
        assert_eq!(interp.machine.ip, 1);
        assert_eq!(interp.instruction_count(), 1);
    }

    #[test]
    fn test_unknown_major_faults_and_continues() {
        // UNKNOWN, PUSH 1, HALT - the bad opcode must not stop the run
        let mut interp = create_test_interpreter(vec![0xF000, word(0x0, 1), word(0x9, 0)]);
        interp.run().unwrap();

        assert_eq!(interp.machine.fault, Fault::IllegalParameter);
        assert_eq!(interp.machine.stack_contents(), &[1]);
        assert!(interp.machine.halted);
    }

    #[test]
    fn test_code_bounds_auto_halt() {
        // Fill the entire code region with PUSH 0 and no HALT; the machine
        // must halt exactly when IP steps past the last code cell.
        let words = vec![word(0x0, 0); CODE_WORD_CAPACITY];
        let mut interp = create_test_interpreter(words);
        interp.run().unwrap();

        assert!(interp.machine.halted);
        assert_eq!(interp.machine.ip, CODE_WORD_CAPACITY);
        assert_eq!(interp.instruction_count(), CODE_WORD_CAPACITY as u64);
    }

    #[test]
    fn test_auto_halt_off_by_one() {
        // The instruction in the last code cell still executes; only the
        // post-increment past it trips the bounds check.
        let words = vec![word(0x0, 7); CODE_WORD_CAPACITY];
        let mut interp = create_test_interpreter(words);

        for _ in 0..CODE_WORD_CAPACITY - 1 {
            interp.step().unwrap();
        }
        assert!(!interp.machine.halted);
        assert_eq!(interp.machine.ip, CODE_WORD_CAPACITY - 1);

        interp.step().unwrap();
        assert!(interp.machine.halted);
        assert_eq!(interp.machine.sp, CODE_WORD_CAPACITY);
    }

    #[test]
    fn test_step_after_halt_is_noop() {
        let mut interp = create_test_interpreter(vec![word(0x9, 0)]);
        interp.run().unwrap();

        let before = interp.machine.snapshot();
        interp.step().unwrap();
        assert_eq!(interp.machine.snapshot(), before);
    }

    #[test]
    fn test_run_with_limit() {
        // No HALT; a tight limit must abort the run with an error
        let words = vec![word(0x0, 1); 100];
        let mut interp = create_test_interpreter(words);
        let err = interp.run_with_limit(Some(10)).unwrap_err();
        assert!(err.contains("limit"));
        assert_eq!(interp.machine.sp, 10);
    }

    #[test]
    fn test_pop_on_empty_stack_is_host_error() {
        // Stack misuse is a host-level error, not a machine fault
        let mut interp = create_test_interpreter(vec![word(0x1, 0)]);
        assert!(interp.run().is_err());
        assert_eq!(interp.machine.fault, Fault::None);
    }
}
