use crate::machine::{CODE_BASE_INDEX, MEM_CELL_COUNT};

/// Number of instruction words the code region can hold
pub const CODE_WORD_CAPACITY: usize = MEM_CELL_COUNT / 2 - CODE_BASE_INDEX;

/// A program image: the sequence of instruction words an external
/// assembler produced, ready to deposit into the code region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    words: Vec<u16>,
}

impl Program {
    /// Parse a program from raw bytes, two bytes per word, big-endian
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, String> {
        if bytes.len() % 2 != 0 {
            return Err(format!(
                "Program file has odd length ({} bytes); expected 16-bit words",
                bytes.len()
            ));
        }
        let words: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        Program::from_words(words)
    }

    /// Build a program from already-decoded instruction words
    pub fn from_words(words: Vec<u16>) -> Result<Self, String> {
        if words.len() > CODE_WORD_CAPACITY {
            return Err(format!(
                "Program too large: {} words, code region holds {}",
                words.len(),
                CODE_WORD_CAPACITY
            ));
        }
        Ok(Program { words })
    }

    /// The instruction words in execution order
    pub fn words(&self) -> &[u16] {
        &self.words
    }

    /// Number of instruction words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_big_endian() {
        let program = Program::from_bytes(&[0x90, 0x00, 0x00, 0x2A]).unwrap();
        assert_eq!(program.words(), &[0x9000, 0x002A]);
        assert_eq!(program.len(), 2);
    }

    #[test]
    fn test_odd_length_rejected() {
        let err = Program::from_bytes(&[0x90, 0x00, 0x2A]).unwrap_err();
        assert!(err.contains("odd length"));
    }

    #[test]
    fn test_oversized_program_rejected() {
        let words = vec![0u16; CODE_WORD_CAPACITY + 1];
        assert!(Program::from_words(words).is_err());

        // Exactly filling the code region is fine
        let words = vec![0u16; CODE_WORD_CAPACITY];
        assert!(Program::from_words(words).is_ok());
    }

    #[test]
    fn test_empty_program() {
        let program = Program::from_bytes(&[]).unwrap();
        assert!(program.is_empty());
    }
}
