use super::processor::{InstructionProcessor, Step};
use crate::vm::error::{StackError, VMFault};
use crate::vm::instruction::Opcode;
use crate::vm::io::IoPorts;
use crate::vm::state::VMState;

/// Processor for stack manipulation instructions
pub struct StackOperations;

impl StackOperations {
    pub fn new() -> Self {
        StackOperations
    }
}

impl InstructionProcessor for StackOperations {
    fn can_process(&self, opcode: Opcode) -> bool {
        matches!(opcode, Opcode::Push | Opcode::Pop)
    }

    fn process(&self, vm: &mut VMState, _ports: &IoPorts, opcode: Opcode) -> Result<Step, VMFault> {
        match opcode {
            // push a: push <a> onto the stack
            Opcode::Push => {
                let val = vm.resolve_value(1)?;
                vm.stack.push(val);
                Ok(Step::Next)
            }
            // pop a: remove the top element from the stack and write it into <a>
            Opcode::Pop => {
                let val = vm.stack.pop().map_err(|e| match e {
                    StackError::Underflow => VMFault::StackUnderflow {
                        address: vm.ip as usize,
                    },
                })?;
                vm.resolve_target(1, val)?;
                Ok(Step::Next)
            }
            _ => Err(VMFault::InvalidOpcode {
                address: vm.ip as usize,
                opcode: opcode as u16,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::vm::error::VMFault;
    use crate::vm::executor::processor::{InstructionProcessor, Step};
    use crate::vm::executor::stack_ops::StackOperations;
    use crate::vm::executor::test_support::{R0, R1, setup};
    use crate::vm::instruction::Opcode;
    use crate::vm::registers::Register;

    #[test]
    fn test_can_process() {
        let processor = StackOperations::new();
        assert!(processor.can_process(Opcode::Push));
        assert!(processor.can_process(Opcode::Pop));
        assert!(!processor.can_process(Opcode::Nop));
        assert!(!processor.can_process(Opcode::Call));
    }

    #[test]
    fn test_push_value() {
        let (mut vm, _console, ports) = setup(&[2, 123]);
        let result = StackOperations::new().process(&mut vm, &ports, Opcode::Push);
        assert_eq!(result, Ok(Step::Next));
        assert_eq!(vm.stack.view(), &[123]);
    }

    #[test]
    fn test_push_register() {
        let (mut vm, _console, ports) = setup(&[2, R1]);
        vm.registers.set(Register::R1, 42);
        StackOperations::new()
            .process(&mut vm, &ports, Opcode::Push)
            .unwrap();
        assert_eq!(vm.stack.pop().unwrap(), 42);
    }

    #[test]
    fn test_pop_to_register() {
        let (mut vm, _console, ports) = setup(&[3, R0]);
        vm.stack.push(123);
        let result = StackOperations::new().process(&mut vm, &ports, Opcode::Pop);
        assert!(result.is_ok());
        assert_eq!(vm.registers.get(Register::R0), 123);
        assert!(vm.stack.is_empty());
    }

    #[test]
    fn test_push_then_pop_round_trip() {
        let processor = StackOperations::new();
        let (mut vm, _console, ports) = setup(&[2, 777]);
        vm.stack.push(5);
        processor.process(&mut vm, &ports, Opcode::Push).unwrap();

        vm.memory[0] = 3;
        vm.memory[1] = R0;
        processor.process(&mut vm, &ports, Opcode::Pop).unwrap();
        assert_eq!(vm.registers.get(Register::R0), 777);
        assert_eq!(vm.stack.view(), &[5]);
    }

    #[test]
    fn test_pop_empty_stack() {
        let (mut vm, _console, ports) = setup(&[3, R0]);
        let result = StackOperations::new().process(&mut vm, &ports, Opcode::Pop);
        assert!(matches!(
            result.unwrap_err(),
            VMFault::StackUnderflow { address: 0 }
        ));
    }

    #[test]
    fn test_pop_into_literal_fails() {
        let (mut vm, _console, ports) = setup(&[3, 9]);
        vm.stack.push(1);
        let result = StackOperations::new().process(&mut vm, &ports, Opcode::Pop);
        assert_eq!(
            result,
            Err(VMFault::NotARegister {
                address: 1,
                value: 9
            })
        );
    }
}
