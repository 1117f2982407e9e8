use super::processor::{InstructionProcessor, Step};
use crate::config::MODULUS;
use crate::vm::error::VMFault;
use crate::vm::instruction::Opcode;
use crate::vm::io::IoPorts;
use crate::vm::state::VMState;

/// Processor for arithmetic operations, all results wrap at 32768
pub struct ArithmeticOperations;

impl ArithmeticOperations {
    pub fn new() -> Self {
        ArithmeticOperations
    }
}

impl InstructionProcessor for ArithmeticOperations {
    fn can_process(&self, opcode: Opcode) -> bool {
        matches!(opcode, Opcode::Add | Opcode::Mult | Opcode::Mod)
    }

    fn process(&self, vm: &mut VMState, _ports: &IoPorts, opcode: Opcode) -> Result<Step, VMFault> {
        let b = vm.resolve_value(2)? as u32;
        let c = vm.resolve_value(3)? as u32;

        let result = match opcode {
            // add a b c: assign into <a> the sum of <b> and <c> (modulo 32768)
            Opcode::Add => (b + c) % MODULUS,
            // mult a b c: store into <a> the product of <b> and <c> (modulo 32768)
            Opcode::Mult => (b * c) % MODULUS,
            // mod a b c: store into <a> the remainder of <b> divided by <c>
            Opcode::Mod => {
                if c == 0 {
                    return Err(VMFault::DivisionByZero {
                        address: vm.ip as usize,
                    });
                }
                b % c
            }
            _ => {
                return Err(VMFault::InvalidOpcode {
                    address: vm.ip as usize,
                    opcode: opcode as u16,
                });
            }
        };

        vm.resolve_target(1, result as u16)?;
        Ok(Step::Next)
    }
}
