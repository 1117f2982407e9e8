use super::processor::{InstructionProcessor, Step};
use crate::vm::error::VMFault;
use crate::vm::instruction::Opcode;
use crate::vm::io::IoPorts;
use crate::vm::state::VMState;

/// Processor for miscellaneous operations like Halt and Nop
pub struct MiscellaneousOperations;

impl MiscellaneousOperations {
    pub fn new() -> Self {
        MiscellaneousOperations
    }
}

impl InstructionProcessor for MiscellaneousOperations {
    fn can_process(&self, opcode: Opcode) -> bool {
        matches!(opcode, Opcode::Halt | Opcode::Nop)
    }

    fn process(&self, vm: &mut VMState, _ports: &IoPorts, opcode: Opcode) -> Result<Step, VMFault> {
        match opcode {
            // halt: stop execution and terminate the program
            Opcode::Halt => Ok(Step::Halt),
            // nop: no operation
            Opcode::Nop => Ok(Step::Next),
            _ => Err(VMFault::InvalidOpcode {
                address: vm.ip as usize,
                opcode: opcode as u16,
            }),
        }
    }
}
