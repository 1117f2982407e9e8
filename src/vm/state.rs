// VM State: memory, registers, stack, ip, current instruction size and run status

use super::error::VMFault;
use super::program::ProgramImage;
use super::registers::Registers;
use super::stack::Stack;
use crate::config::MEMORY_SIZE;

/// Where a run currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Halted,
    Cancelled,
    Faulted(VMFault),
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Status::Running)
    }
}

/// Execution state of one virtual machine
#[derive(Debug, Clone)]
pub struct VMState {
    pub memory: Vec<u16>, // Always exactly MEMORY_SIZE words
    pub registers: Registers,
    pub stack: Stack,
    pub ip: u16,   // Address of the opcode being executed
    pub size: u16, // Words occupied by the current instruction
    pub status: Status,
}

impl VMState {
    pub fn new(image: &ProgramImage) -> Self {
        let mut memory = vec![0; MEMORY_SIZE];
        memory[..image.len()].copy_from_slice(image.words());

        VMState {
            memory,
            registers: Registers::new(),
            stack: Stack::new(),
            ip: 0,
            size: 1,
            status: Status::Running,
        }
    }

    /// Reads the word at `address`
    pub fn read_memory(&self, address: usize) -> Result<u16, VMFault> {
        self.memory
            .get(address)
            .copied()
            .ok_or(VMFault::AddressOutOfRange { address })
    }

    /// Writes `value` at `address`
    pub fn write_memory(&mut self, address: usize, value: u16) -> Result<(), VMFault> {
        let slot = self
            .memory
            .get_mut(address)
            .ok_or(VMFault::AddressOutOfRange { address })?;
        *slot = value;
        Ok(())
    }

    /// Address of the instruction following the current one
    pub fn next_ip(&self) -> u16 {
        self.ip + self.size
    }

    pub fn advance_ip(&mut self) {
        self.ip = self.next_ip();
    }

    pub fn set_fault(&mut self, fault: VMFault) {
        self.status = Status::Faulted(fault);
    }

    /// The fault that ended the run, if any
    pub fn fault(&self) -> Option<VMFault> {
        match self.status {
            Status::Faulted(fault) => Some(fault),
            _ => None,
        }
    }
}
