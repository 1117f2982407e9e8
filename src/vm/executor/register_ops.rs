use super::processor::{InstructionProcessor, Step};
use crate::vm::error::VMFault;
use crate::vm::instruction::Opcode;
use crate::vm::io::IoPorts;
use crate::vm::state::VMState;

/// Processor for register assignment and comparison instructions
pub struct RegisterOperations;

impl RegisterOperations {
    pub fn new() -> Self {
        RegisterOperations
    }
}

impl InstructionProcessor for RegisterOperations {
    fn can_process(&self, opcode: Opcode) -> bool {
        matches!(opcode, Opcode::Set | Opcode::Eq | Opcode::Gt)
    }

    fn process(&self, vm: &mut VMState, _ports: &IoPorts, opcode: Opcode) -> Result<Step, VMFault> {
        match opcode {
            // set a b: set register <a> to the value of <b>
            Opcode::Set => {
                let b = vm.resolve_value(2)?;
                vm.resolve_target(1, b)?;
            }
            // eq a b c: set <a> to 1 if <b> is equal to <c>; set it to 0 otherwise
            Opcode::Eq => {
                let (b, c) = (vm.resolve_value(2)?, vm.resolve_value(3)?);
                vm.resolve_target(1, (b == c) as u16)?;
            }
            // gt a b c: set <a> to 1 if <b> is greater than <c>; set it to 0 otherwise
            Opcode::Gt => {
                let (b, c) = (vm.resolve_value(2)?, vm.resolve_value(3)?);
                vm.resolve_target(1, (b > c) as u16)?;
            }
            _ => {
                return Err(VMFault::InvalidOpcode {
                    address: vm.ip as usize,
                    opcode: opcode as u16,
                });
            }
        }
        Ok(Step::Next)
    }
}
