pub mod display;
pub mod error;
pub mod interpreter;
pub mod keypad;
pub mod opcode;
mod memory;
mod registers;

pub use error::{LoadError, MachineFault};
pub use interpreter::Interpreter;
pub use memory::{MAX_ROM_SIZE, START_ROM};

pub type Error = anyhow::Error;
pub type Result<T> = anyhow::Result<T>;
