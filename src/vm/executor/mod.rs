// VM Instruction execution: one processor per instruction family behind an opcode lookup table

pub mod arithmetic_ops;
pub mod bitwise_ops;
pub mod control_flow_ops;
pub mod instruction_executor;
pub mod io_ops;
pub mod memory_ops;
pub mod misc_ops;
pub mod processor;
pub mod register_ops;
pub mod stack_ops;

pub use instruction_executor::InstructionExecutor;
pub use processor::{InstructionProcessor, Step};
