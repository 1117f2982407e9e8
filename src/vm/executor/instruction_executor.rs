use crate::vm::error::VMFault;
use crate::vm::instruction::Opcode;
use crate::vm::io::IoPorts;
use crate::vm::state::VMState;

use super::arithmetic_ops::ArithmeticOperations;
use super::bitwise_ops::BitwiseOperations;
use super::control_flow_ops::ControlFlowOperations;
use super::io_ops::IoOperations;
use super::memory_ops::MemoryOperations;
use super::misc_ops::MiscellaneousOperations;
use super::processor::{InstructionProcessor, Step};
use super::register_ops::RegisterOperations;
use super::stack_ops::StackOperations;

/// A struct that holds all instruction processors
pub struct InstructionExecutor {
    processors: Vec<Box<dyn InstructionProcessor>>,
    // Index into `processors` for every opcode, built once
    table: [Option<usize>; Opcode::COUNT],
}

impl InstructionExecutor {
    /// Create a new executor with all processors registered
    pub fn new() -> Self {
        let processors: Vec<Box<dyn InstructionProcessor>> = vec![
            Box::new(StackOperations::new()),
            Box::new(RegisterOperations::new()),
            Box::new(ArithmeticOperations::new()),
            Box::new(BitwiseOperations::new()),
            Box::new(MemoryOperations::new()),
            Box::new(ControlFlowOperations::new()),
            Box::new(IoOperations::new()),
            Box::new(MiscellaneousOperations::new()),
        ];

        let mut table = [None; Opcode::COUNT];
        for opcode in Opcode::ALL {
            table[opcode as usize] = processors.iter().position(|p| p.can_process(opcode));
        }

        InstructionExecutor { processors, table }
    }

    /// Execute a single instruction, delegating to the processor registered for its opcode
    pub fn execute_instruction(
        &self,
        vm: &mut VMState,
        ports: &IoPorts,
        opcode: Opcode,
    ) -> Result<Step, VMFault> {
        match self.table[opcode as usize] {
            Some(index) => self.processors[index].process(vm, ports, opcode),
            None => Err(VMFault::InvalidOpcode {
                address: vm.ip as usize,
                opcode: opcode as u16,
            }),
        }
    }
}

impl Default for InstructionExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::vm::executor::InstructionExecutor;
    use crate::vm::executor::processor::Step;
    use crate::vm::executor::test_support::{R0, setup};
    use crate::vm::instruction::Opcode;
    use crate::vm::registers::Register;

    #[test]
    fn test_every_opcode_has_a_processor() {
        let executor = InstructionExecutor::new();
        for opcode in Opcode::ALL {
            assert!(
                executor.table[opcode as usize].is_some(),
                "no processor for {}",
                opcode
            );
        }
    }

    #[test]
    fn test_stack_operations_delegation() {
        let executor = InstructionExecutor::new();
        let (mut vm, _console, ports) = setup(&[2, 42]);
        assert_eq!(
            executor.execute_instruction(&mut vm, &ports, Opcode::Push),
            Ok(Step::Next)
        );

        vm.memory[0] = 3;
        vm.memory[1] = R0;
        executor
            .execute_instruction(&mut vm, &ports, Opcode::Pop)
            .unwrap();
        assert_eq!(vm.registers.get(Register::R0), 42);
    }

    #[test]
    fn test_arithmetic_execution() {
        let executor = InstructionExecutor::new();
        let (mut vm, _console, ports) = setup(&[10, R0, 12, 12]);
        executor
            .execute_instruction(&mut vm, &ports, Opcode::Mult)
            .unwrap();
        assert_eq!(vm.registers.get(Register::R0), 144);
    }

    #[test]
    fn test_control_flow_delegation() {
        let executor = InstructionExecutor::new();
        let (mut vm, _console, ports) = setup(&[6, 8]);
        assert_eq!(
            executor.execute_instruction(&mut vm, &ports, Opcode::Jmp),
            Ok(Step::Jump(8))
        );
    }
}
