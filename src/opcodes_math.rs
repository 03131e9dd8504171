/// Arithmetic, logic, and bit-shift instruction families.
///
/// All three operate on the top of the operand stack in place. Each
/// handler's stack-pointer delta is its own postcondition:
/// - ARITH always shrinks the stack by one, even on an illegal minor opcode
/// - LOGIC shrinks by one for AND/OR, not at all for NOT or on a fault
/// - BSHIFT's delta depends on the `legacy_shift_growth` switch
use crate::instruction::{ArithOp, Instruction, LogicOp, ShiftDirection};
use crate::machine::Fault;
use crate::interpreter::Interpreter;
use log::debug;

/// Logical shift with the count field's full 0-255 range; anything at or
/// past the register width shifts every bit out.
fn shift_value(value: u16, direction: ShiftDirection, count: u16) -> u16 {
    if count >= 16 {
        return 0;
    }
    match direction {
        ShiftDirection::Left => value << count,
        ShiftDirection::Right => value >> count,
    }
}

impl Interpreter {
    /// ARITH: combine the top two stack values.
    ///
    /// `top = stack[SP-1]`, `second = stack[SP-2]`; the result `top OP
    /// second` replaces `second`, and SP drops by one whether or not the
    /// minor opcode was valid. Division is unsigned and truncates; dividing
    /// by zero records ILLEGAL_PARAMETER and leaves the cells untouched.
    pub(crate) fn execute_arith(&mut self, inst: &Instruction) -> Result<(), String> {
        self.machine.require_depth(2)?;
        let sp = self.machine.sp;
        let top = self.machine.stack_cell(sp - 1);
        let second = self.machine.stack_cell(sp - 2);

        match ArithOp::from_bits(inst.operand) {
            Some(ArithOp::Add) => {
                debug!("add {top} {second}");
                self.machine.set_stack_cell(sp - 2, top.wrapping_add(second));
            }
            Some(ArithOp::Sub) => {
                debug!("sub {top} {second}");
                self.machine.set_stack_cell(sp - 2, top.wrapping_sub(second));
            }
            Some(ArithOp::Mult) => {
                debug!("mult {top} {second}");
                self.machine.set_stack_cell(sp - 2, top.wrapping_mul(second));
            }
            Some(ArithOp::Div) => {
                debug!("div {top} {second}");
                if second == 0 {
                    self.machine.record_fault(Fault::IllegalParameter);
                } else {
                    self.machine.set_stack_cell(sp - 2, top / second);
                }
            }
            None => {
                self.machine.record_fault(Fault::IllegalParameter);
            }
        }

        // Two operands collapse into one slot, fault or not
        self.machine.sp -= 1;
        Ok(())
    }

    /// LOGIC: AND/OR combine the top two values into one slot (SP drops by
    /// one); NOT complements the top in place. An unknown minor opcode
    /// records ILLEGAL_PARAMETER with no stack effect.
    pub(crate) fn execute_logic(&mut self, inst: &Instruction) -> Result<(), String> {
        match LogicOp::from_bits(inst.operand) {
            Some(LogicOp::And) => {
                self.machine.require_depth(2)?;
                let sp = self.machine.sp;
                let result = self.machine.stack_cell(sp - 1) & self.machine.stack_cell(sp - 2);
                debug!("and -> {result:04x}");
                self.machine.set_stack_cell(sp - 2, result);
                self.machine.sp -= 1;
            }
            Some(LogicOp::Or) => {
                self.machine.require_depth(2)?;
                let sp = self.machine.sp;
                let result = self.machine.stack_cell(sp - 1) | self.machine.stack_cell(sp - 2);
                debug!("or -> {result:04x}");
                self.machine.set_stack_cell(sp - 2, result);
                self.machine.sp -= 1;
            }
            Some(LogicOp::Not) => {
                self.machine.require_depth(1)?;
                let sp = self.machine.sp;
                let result = !self.machine.stack_cell(sp - 1);
                debug!("not -> {result:04x}");
                self.machine.set_stack_cell(sp - 1, result);
            }
            None => {
                self.machine.record_fault(Fault::IllegalParameter);
            }
        }
        Ok(())
    }

    /// BSHIFT: shift the stack top in place by the count field.
    ///
    /// With `legacy_shift_growth` set, SP then grows by one no matter what,
    /// exposing a stale slot - including when the direction field was
    /// invalid and nothing was shifted. With it clear, SP never changes.
    pub(crate) fn execute_shift(&mut self, inst: &Instruction) -> Result<(), String> {
        let count = inst.operand & 0x00FF;

        match ShiftDirection::from_bits(inst.operand >> 8) {
            Some(direction) => {
                self.machine.require_depth(1)?;
                let sp = self.machine.sp;
                let value = self.machine.stack_cell(sp - 1);
                let result = shift_value(value, direction, count);
                debug!("shift {direction:?} {count}: {value:04x} -> {result:04x}");
                self.machine.set_stack_cell(sp - 1, result);
            }
            None => {
                self.machine.record_fault(Fault::IllegalParameter);
            }
        }

        if self.config.legacy_shift_growth {
            self.machine.bump_sp()?;
        }
        Ok(())
    }
}
