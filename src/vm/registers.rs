// VM Register system: register enum, storage, and access logic

use crate::config::{REGISTER_BASE, REGISTER_COUNT, REGISTER_LIMIT};

/// Enum for the eight general purpose registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
}

impl Register {
    pub const ALL: [Register; REGISTER_COUNT] = [
        Register::R0,
        Register::R1,
        Register::R2,
        Register::R3,
        Register::R4,
        Register::R5,
        Register::R6,
        Register::R7,
    ];

    /// Decodes a raw word in [32768, 32775] into the register it names
    pub fn from_word(word: u16) -> Option<Register> {
        if (REGISTER_BASE..REGISTER_LIMIT).contains(&word) {
            Some(Self::ALL[(word - REGISTER_BASE) as usize])
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// The raw word that refers to this register in program memory
    pub fn word(self) -> u16 {
        REGISTER_BASE + self as u16
    }
}

/// Storage for all VM registers
#[derive(Debug, Clone, Default)]
pub struct Registers {
    data: [u16; REGISTER_COUNT],
}

impl Registers {
    pub fn new() -> Self {
        Registers::default()
    }

    pub fn get(&self, reg: Register) -> u16 {
        self.data[reg.index()]
    }

    pub fn set(&mut self, reg: Register, value: u16) {
        self.data[reg.index()] = value;
    }

    pub fn view(&self) -> &[u16] {
        &self.data
    }
}
