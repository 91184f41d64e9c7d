use thiserror::Error;

/// Why a program could not be copied into memory.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("program is {size} bytes, but at most {max} bytes fit above 0x200")]
    TooLarge { size: usize, max: usize },
}

/// A fatal condition raised while executing an instruction.
///
/// `addr` is always the address of the instruction that faulted,
/// and the VM state is left as it was before that instruction ran.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Fault {
    #[error("unknown instruction {word:#06X} at {addr:#05X}")]
    Decode { addr: u16, word: u16 },

    #[error("call stack overflow by {word:#06X} at {addr:#05X}")]
    StackOverflow { addr: u16, word: u16 },

    #[error("return with empty call stack by {word:#06X} at {addr:#05X}")]
    StackUnderflow { addr: u16, word: u16 },

    #[error("{word:#06X} at {addr:#05X} accessed out of range index {target:#X}")]
    MemoryBounds { addr: u16, word: u16, target: usize },

    #[error("program counter {addr:#05X} is outside memory")]
    PcOutOfBounds { addr: u16 },
}

impl Fault {
    /// Address of the offending instruction.
    pub fn addr(&self) -> u16 {
        match *self {
            Fault::Decode { addr, .. }
            | Fault::StackOverflow { addr, .. }
            | Fault::StackUnderflow { addr, .. }
            | Fault::MemoryBounds { addr, .. }
            | Fault::PcOutOfBounds { addr } => addr,
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn messages_print_hex_context() {
        let fault = Fault::Decode { addr: 0x204, word: 0x5123 };
        assert_eq!(fault.to_string(), "unknown instruction 0x5123 at 0x204");

        let fault = Fault::MemoryBounds { addr: 0x200, word: 0xF355, target: 0x1000 };
        assert_eq!(fault.to_string(), "0xF355 at 0x200 accessed out of range index 0x1000");
        assert_eq!(fault.addr(), 0x200);
        assert_eq!(Fault::PcOutOfBounds { addr: 0xFFF }.addr(), 0xFFF);
    }

    #[test]
    fn load_error_reports_sizes() {
        let error = LoadError::TooLarge { size: 3585, max: 3584 };
        assert_eq!(error.to_string(), "program is 3585 bytes, but at most 3584 bytes fit above 0x200");
    }
}
