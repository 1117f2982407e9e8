// VM module entry point

pub mod engine;
pub mod error;
pub mod executor;
pub mod instruction;
pub mod io;
pub mod machine;
pub mod operand;
pub mod program;
pub mod registers;
pub mod stack;
pub mod state;

pub use engine::{Completion, Engine};
pub use error::{LoadError, VMFault, VmError};
pub use machine::{Machine, Outcome};
pub use program::ProgramImage;
