use super::processor::{InstructionProcessor, Step};
use crate::vm::error::VMFault;
use crate::vm::instruction::Opcode;
use crate::vm::io::IoPorts;
use crate::vm::state::VMState;

/// Processor for control flow operations
pub struct ControlFlowOperations;

impl ControlFlowOperations {
    pub fn new() -> Self {
        ControlFlowOperations
    }
}

impl InstructionProcessor for ControlFlowOperations {
    fn can_process(&self, opcode: Opcode) -> bool {
        matches!(
            opcode,
            Opcode::Jmp | Opcode::Jt | Opcode::Jf | Opcode::Call | Opcode::Ret
        )
    }

    fn process(&self, vm: &mut VMState, _ports: &IoPorts, opcode: Opcode) -> Result<Step, VMFault> {
        match opcode {
            // jmp a: jump to <a>
            Opcode::Jmp => {
                let target = vm.resolve_value(1)?;
                crate::debug_instructions!(@vm.ip, "jmp: jumping to {}", target);
                Ok(Step::Jump(target))
            }
            // jt a b: if <a> is nonzero, jump to <b>
            Opcode::Jt => {
                let (cond, target) = (vm.resolve_value(1)?, vm.resolve_value(2)?);
                crate::debug_instructions!(@vm.ip, "jt: {} != 0? jumping to {}", cond, target);
                Ok(if cond != 0 { Step::Jump(target) } else { Step::Next })
            }
            // jf a b: if <a> is zero, jump to <b>
            Opcode::Jf => {
                let (cond, target) = (vm.resolve_value(1)?, vm.resolve_value(2)?);
                crate::debug_instructions!(@vm.ip, "jf: {} == 0? jumping to {}", cond, target);
                Ok(if cond == 0 { Step::Jump(target) } else { Step::Next })
            }
            // call a: write the address of the next instruction to the stack and jump to <a>
            Opcode::Call => {
                let target = vm.resolve_value(1)?;
                vm.stack.push(vm.next_ip());
                crate::debug_instructions!(@vm.ip, "call: {} (return to {})", target, vm.next_ip());
                Ok(Step::Jump(target))
            }
            // ret: remove the top element from the stack and jump to it; empty stack = halt
            Opcode::Ret => match vm.stack.pop() {
                Ok(target) => Ok(Step::Jump(target)),
                Err(_) => {
                    crate::debug_vm!("ret with empty stack at {}, halting", vm.ip);
                    Ok(Step::Halt)
                }
            },
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
    use crate::vm::executor::control_flow_ops::ControlFlowOperations;
    use crate::vm::executor::processor::{InstructionProcessor, Step};
    use crate::vm::executor::test_support::{R0, setup};
    use crate::vm::instruction::Opcode;
    use crate::vm::registers::Register;

    fn run(words: &[u16]) -> Result<Step, VMFault> {
        let (mut vm, _console, ports) = setup(words);
        let op = Opcode::try_from(words[0]).unwrap();
        ControlFlowOperations::new().process(&mut vm, &ports, op)
    }

    #[test]
    fn test_can_process() {
        let processor = ControlFlowOperations::new();
        for op in [Opcode::Jmp, Opcode::Jt, Opcode::Jf, Opcode::Call, Opcode::Ret] {
            assert!(processor.can_process(op));
        }
        assert!(!processor.can_process(Opcode::Halt));
        assert!(!processor.can_process(Opcode::Push));
    }

    #[test]
    fn test_jmp() {
        assert_eq!(run(&[6, 1234]), Ok(Step::Jump(1234)));
    }

    #[test]
    fn test_jmp_through_register() {
        let (mut vm, _console, ports) = setup(&[6, R0]);
        vm.registers.set(Register::R0, 99);
        let result = ControlFlowOperations::new().process(&mut vm, &ports, Opcode::Jmp);
        assert_eq!(result, Ok(Step::Jump(99)));
    }

    #[test]
    fn test_jt() {
        assert_eq!(run(&[7, 1, 50]), Ok(Step::Jump(50)));
        assert_eq!(run(&[7, 0, 50]), Ok(Step::Next));
    }

    #[test]
    fn test_jf() {
        assert_eq!(run(&[8, 0, 50]), Ok(Step::Jump(50)));
        assert_eq!(run(&[8, 3, 50]), Ok(Step::Next));
    }

    #[test]
    fn test_conditional_checks_both_operands() {
        // The target is validated even when the branch is not taken
        assert!(matches!(
            run(&[7, 0, 40000]),
            Err(VMFault::InvalidValue { address: 2, .. })
        ));
    }

    #[test]
    fn test_call_pushes_return_address() {
        let (mut vm, _console, ports) = setup(&[21, 21, 17, 300]);
        vm.ip = 2;
        vm.size = Opcode::Call.size();
        let result = ControlFlowOperations::new().process(&mut vm, &ports, Opcode::Call);
        assert_eq!(result, Ok(Step::Jump(300)));
        assert_eq!(vm.stack.view(), &[4]);
    }

    #[test]
    fn test_ret_pops_address() {
        let (mut vm, _console, ports) = setup(&[18]);
        vm.stack.push(77);
        let result = ControlFlowOperations::new().process(&mut vm, &ports, Opcode::Ret);
        assert_eq!(result, Ok(Step::Jump(77)));
        assert!(vm.stack.is_empty());
    }

    #[test]
    fn test_ret_on_empty_stack_halts() {
        assert_eq!(run(&[18]), Ok(Step::Halt));
    }
}
