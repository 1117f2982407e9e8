use crate::config::MAX_VALUE;
use crate::vm::error::VMFault;
use crate::vm::registers::Register;
use crate::vm::state::VMState;

/// Represents a literal value or register operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Value(u16),
    Register(Register),
}

impl Operand {
    /// Decodes the raw operand word found at `address`.
    ///
    /// - 0..=32767 is a literal value
    /// - 32768..=32775 names registers 0..7
    /// - anything larger is invalid
    pub fn decode(word: u16, address: usize) -> Result<Operand, VMFault> {
        if word <= MAX_VALUE {
            return Ok(Operand::Value(word));
        }
        Register::from_word(word)
            .map(Operand::Register)
            .ok_or(VMFault::InvalidValue {
                address,
                value: word,
            })
    }

    /// Gets the operand value
    pub(crate) fn get_value(&self, vm: &VMState) -> u16 {
        match self {
            Operand::Value(val) => *val,
            Operand::Register(r) => vm.registers.get(*r),
        }
    }
}

impl VMState {
    fn operand_address(&self, position: u16) -> usize {
        debug_assert!(
            position > 0 && position < self.size,
            "operand {} outside instruction of size {}",
            position,
            self.size
        );
        self.ip as usize + position as usize
    }

    /// Value of the 1-indexed operand, read as a literal or through a register
    pub fn resolve_value(&self, position: u16) -> Result<u16, VMFault> {
        let address = self.operand_address(position);
        let operand = Operand::decode(self.read_memory(address)?, address)?;
        let val = operand.get_value(self);
        if let Operand::Register(r) = operand {
            log::trace!(target: "instructions", "Read register {:?} = {}", r, val);
        }
        Ok(val)
    }

    /// Stores `value` in the register named by the 1-indexed operand
    pub fn resolve_target(&mut self, position: u16, value: u16) -> Result<(), VMFault> {
        let address = self.operand_address(position);
        let word = self.read_memory(address)?;
        let reg = Register::from_word(word).ok_or(VMFault::NotARegister {
            address,
            value: word,
        })?;
        log::trace!(target: "instructions", "Write register {:?} = {}", reg, value);
        self.registers.set(reg, value);
        Ok(())
    }
}
