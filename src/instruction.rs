use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;

lazy_static! {
    /// Register names by STORER/LOADR operand index
    pub static ref REGISTER_NAMES: HashMap<u16, &'static str> = {
        let mut m = HashMap::new();
        m.insert(0, "Ra");
        m.insert(1, "Rb");
        m.insert(2, "Rc");
        m.insert(3, "Rip");
        m.insert(4, "Rbindx");
        m.insert(5, "Rhlt");
        m.insert(6, "Rerr");
        m.insert(7, "Rcom");
        m.insert(8, "Rvbindx");
        m.insert(9, "Rcbindx");
        m
    };
}

/// Major opcode, from the top 4 bits of an instruction word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// Push a 12-bit immediate
    Push,
    /// Pop the stack top into Ra
    Pop,
    /// Duplicate the stack top
    Dup,
    /// Arithmetic on the top two values (minor opcode selects the operation)
    Arith,
    /// Bitwise logic (minor opcode selects AND/OR/NOT)
    Logic,
    /// Bit shift of the stack top (direction + count fields)
    BShift,
    /// Pop the stack top into a named register
    StoreR,
    /// Push a named register's value
    LoadR,
    /// Console output (category + sub-function fields)
    Io,
    /// Set the halt flag
    Halt,
    /// No instruction is assigned to this major value
    Unknown(u16),
}

impl Opcode {
    /// Decode the major opcode field
    pub fn from_major(bits: u16) -> Opcode {
        match bits & 0x0F {
            0x0 => Opcode::Push,
            0x1 => Opcode::Pop,
            0x2 => Opcode::Dup,
            0x3 => Opcode::Arith,
            0x4 => Opcode::Logic,
            0x5 => Opcode::BShift,
            0x6 => Opcode::StoreR,
            0x7 => Opcode::LoadR,
            0x8 => Opcode::Io,
            0x9 => Opcode::Halt,
            other => Opcode::Unknown(other),
        }
    }
}

/// ARITH minor opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mult,
    Div,
}

impl ArithOp {
    /// Parse an ARITH minor opcode from the 12-bit operand field
    pub fn from_bits(bits: u16) -> Option<ArithOp> {
        match bits {
            0 => Some(ArithOp::Add),
            1 => Some(ArithOp::Sub),
            2 => Some(ArithOp::Mult),
            3 => Some(ArithOp::Div),
            _ => None,
        }
    }
}

/// LOGIC minor opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
    Not,
}

impl LogicOp {
    /// Parse a LOGIC minor opcode from the 12-bit operand field
    pub fn from_bits(bits: u16) -> Option<LogicOp> {
        match bits {
            0 => Some(LogicOp::And),
            1 => Some(LogicOp::Or),
            2 => Some(LogicOp::Not),
            _ => None,
        }
    }
}

/// BSHIFT direction field (bits 11-8)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDirection {
    Left,
    Right,
}

impl ShiftDirection {
    /// Parse the shift direction from its 4-bit field
    pub fn from_bits(bits: u16) -> Option<ShiftDirection> {
        match bits & 0x0F {
            0 => Some(ShiftDirection::Left),
            1 => Some(ShiftDirection::Right),
            _ => None,
        }
    }
}

/// IO category field (bits 11-6)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoCategory {
    /// Print a value, consuming the stack top
    Print,
    /// Emit a single control character, no stack effect
    PrintEseq,
}

impl IoCategory {
    /// Parse the IO category from its 6-bit field
    pub fn from_bits(bits: u16) -> Option<IoCategory> {
        match bits & 0x3F {
            0 => Some(IoCategory::Print),
            1 => Some(IoCategory::PrintEseq),
            _ => None,
        }
    }
}

/// PRINT sub-function (bits 5-0 under the PRINT category)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintOp {
    /// Decimal text of the stack top
    Integer,
}

impl PrintOp {
    pub fn from_bits(bits: u16) -> Option<PrintOp> {
        match bits & 0x3F {
            0 => Some(PrintOp::Integer),
            _ => None,
        }
    }
}

/// PRINT_ESEQ sub-function (bits 5-0 under the PRINT_ESEQ category)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EseqOp {
    /// Line feed
    Newline,
    /// Carriage return
    ReturnCarriage,
}

impl EseqOp {
    pub fn from_bits(bits: u16) -> Option<EseqOp> {
        match bits & 0x3F {
            0 => Some(EseqOp::Newline),
            1 => Some(EseqOp::ReturnCarriage),
            _ => None,
        }
    }
}

/// A decoded instruction word.
///
/// Only the major opcode is resolved here; the meaning of the 12-bit
/// operand field depends on the instruction family, so each handler decodes
/// its own minor fields from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// The raw instruction word
    pub word: u16,
    /// Major opcode from bits 15-12
    pub opcode: Opcode,
    /// Operand field, bits 11-0
    pub operand: u16,
}

impl Instruction {
    /// Decode a 16-bit instruction word
    pub fn decode(word: u16) -> Instruction {
        Instruction {
            word,
            opcode: Opcode::from_major(word >> 12),
            operand: word & 0x0FFF,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.opcode {
            Opcode::Push => write!(f, "PUSH {}", self.operand),
            Opcode::Pop => write!(f, "POP"),
            Opcode::Dup => write!(f, "DUP"),
            Opcode::Arith => match ArithOp::from_bits(self.operand) {
                Some(op) => write!(f, "ARITH {op:?}"),
                None => write!(f, "ARITH ?{:03x}", self.operand),
            },
            Opcode::Logic => match LogicOp::from_bits(self.operand) {
                Some(op) => write!(f, "LOGIC {op:?}"),
                None => write!(f, "LOGIC ?{:03x}", self.operand),
            },
            Opcode::BShift => {
                let count = self.operand & 0xFF;
                match ShiftDirection::from_bits(self.operand >> 8) {
                    Some(dir) => write!(f, "BSHIFT {dir:?} {count}"),
                    None => write!(f, "BSHIFT ?{:x} {count}", self.operand >> 8),
                }
            }
            Opcode::StoreR | Opcode::LoadR => {
                let mnemonic = if self.opcode == Opcode::StoreR {
                    "STORER"
                } else {
                    "LOADR"
                };
                match REGISTER_NAMES.get(&self.operand) {
                    Some(name) => write!(f, "{mnemonic} {name}"),
                    None => write!(f, "{mnemonic} ?{:03x}", self.operand),
                }
            }
            Opcode::Io => {
                let sub = self.operand & 0x3F;
                match IoCategory::from_bits(self.operand >> 6) {
                    Some(IoCategory::Print) => write!(f, "IO PRINT/{sub}"),
                    Some(IoCategory::PrintEseq) => write!(f, "IO PRINT_ESEQ/{sub}"),
                    None => write!(f, "IO ?{:02x}/{sub}", self.operand >> 6),
                }
            }
            Opcode::Halt => write!(f, "HALT"),
            Opcode::Unknown(major) => write!(f, "UNKNOWN({major:x})"),
        }
    }
}
