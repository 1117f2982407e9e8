//! Interpreter for a 16-bit word virtual machine operating on 15-bit values.
//!
//! A program image is loaded into 32768 words of memory and executed by a
//! fetch-decode-execute loop on its own thread. Console bytes flow through
//! bounded queues, and a running program can be halted from the outside at
//! any instruction boundary, including while it waits for input.

pub mod config;
pub mod logging;
pub mod vm;
