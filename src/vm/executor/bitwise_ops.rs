use super::processor::{InstructionProcessor, Step};
use crate::config::MAX_VALUE;
use crate::vm::error::VMFault;
use crate::vm::instruction::Opcode;
use crate::vm::io::IoPorts;
use crate::vm::state::VMState;

/// Processor for bitwise operations
pub struct BitwiseOperations;

impl BitwiseOperations {
    pub fn new() -> Self {
        BitwiseOperations
    }
}

impl InstructionProcessor for BitwiseOperations {
    fn can_process(&self, opcode: Opcode) -> bool {
        matches!(opcode, Opcode::And | Opcode::Or | Opcode::Not)
    }

    fn process(&self, vm: &mut VMState, _ports: &IoPorts, opcode: Opcode) -> Result<Step, VMFault> {
        let result = match opcode {
            // and a b c: stores into <a> the bitwise and of <b> and <c>
            Opcode::And => vm.resolve_value(2)? & vm.resolve_value(3)?,
            // or a b c: stores into <a> the bitwise or of <b> and <c>
            Opcode::Or => vm.resolve_value(2)? | vm.resolve_value(3)?,
            // not a b: stores 15-bit bitwise inverse of <b> in <a>
            Opcode::Not => !vm.resolve_value(2)? & MAX_VALUE,
            _ => {
                return Err(VMFault::InvalidOpcode {
                    address: vm.ip as usize,
                    opcode: opcode as u16,
                });
            }
        };
        vm.resolve_target(1, result)?;
        Ok(Step::Next)
    }
}
