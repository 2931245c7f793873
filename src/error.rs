use thiserror::Error;

/// Errors raised while placing a program into memory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    OversizeRom { size: usize, max: usize },
}

/// Conditions that halt the machine. Once `step` reports one of these it keeps
/// reporting it until the interpreter is reset.
///
/// `pc` is the address of the faulting instruction, or the address that could not
/// be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MachineFault {
    #[error("Stack overflow: call at {pc:#06X} with all 16 stack slots in use")]
    StackOverflow { pc: u16 },

    #[error("Stack underflow: return at {pc:#06X} with an empty call stack")]
    StackUnderflow { pc: u16 },

    #[error("Program counter out of bounds: cannot fetch at {pc:#06X}")]
    ProgramCounterOutOfBounds { pc: u16 },
}
