//! Configuration constants for the virtual machine.

// Word layout
pub const MEMORY_SIZE: usize = 1 << 15; // Number of words in memory
pub const REGISTER_COUNT: usize = 8;
pub const MAX_VALUE: u16 = (1 << 15) - 1; // Largest literal value
pub const MODULUS: u32 = MAX_VALUE as u32 + 1; // Arithmetic wraps at 32768
pub const REGISTER_BASE: u16 = MAX_VALUE + 1; // Raw word naming register 0
pub const REGISTER_LIMIT: u16 = REGISTER_BASE + REGISTER_COUNT as u16; // First invalid raw word

// I/O
pub const IO_QUEUE_CAPACITY: usize = 2048; // Default bytes buffered per direction

// Threading
pub const ENGINE_THREAD_NAME: &str = "vm-engine";
