/// Console output instruction family.
///
/// PRINT renders the stack top and consumes it; PRINT_ESEQ emits a single
/// control character with no stack effect. Everything goes through the
/// interpreter's output sink so tests can capture the stream.
use crate::instruction::{EseqOp, Instruction, IoCategory, PrintOp};
use crate::machine::Fault;
use crate::interpreter::Interpreter;
use log::debug;

impl Interpreter {
    /// IO: dispatch on the category field (bits 11-6) and sub-function
    /// field (bits 5-0).
    ///
    /// PRINT consumes the stack top for every sub-function value, even one
    /// that names no formatter - the value is dropped unprinted. PRINT_ESEQ
    /// ignores unknown sub-functions entirely. Only an unknown category
    /// records a fault.
    pub(crate) fn execute_io(&mut self, inst: &Instruction) -> Result<(), String> {
        let sub = inst.operand & 0x3F;

        match IoCategory::from_bits(inst.operand >> 6) {
            Some(IoCategory::Print) => {
                self.machine.require_depth(1)?;
                if let Some(PrintOp::Integer) = PrintOp::from_bits(sub) {
                    let value = self.machine.peek()?;
                    debug!("print integer {value}");
                    self.output.write_str(&value.to_string())?;
                }
                self.machine.sp -= 1;
            }
            Some(IoCategory::PrintEseq) => match EseqOp::from_bits(sub) {
                Some(EseqOp::Newline) => {
                    debug!("print newline");
                    self.output.write_str("\n")?;
                }
                Some(EseqOp::ReturnCarriage) => {
                    debug!("print carriage return");
                    self.output.write_str("\r")?;
                }
                None => {}
            },
            None => {
                debug!("unknown IO category in operand {:03x}", inst.operand);
                self.machine.record_fault(Fault::IllegalParameter);
            }
        }
        Ok(())
    }
}
