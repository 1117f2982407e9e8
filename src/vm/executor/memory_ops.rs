use super::processor::{InstructionProcessor, Step};
use crate::vm::error::VMFault;
use crate::vm::instruction::Opcode;
use crate::vm::io::IoPorts;
use crate::vm::state::VMState;

/// Processor for memory reads and writes
pub struct MemoryOperations;

impl MemoryOperations {
    pub fn new() -> Self {
        MemoryOperations
    }
}

impl InstructionProcessor for MemoryOperations {
    fn can_process(&self, opcode: Opcode) -> bool {
        matches!(opcode, Opcode::Rmem | Opcode::Wmem)
    }

    fn process(&self, vm: &mut VMState, _ports: &IoPorts, opcode: Opcode) -> Result<Step, VMFault> {
        match opcode {
            // rmem a b: read memory at address <b> and write it to <a>
            Opcode::Rmem => {
                let address = vm.resolve_value(2)? as usize;
                let val = vm.read_memory(address)?;
                vm.resolve_target(1, val)?;
            }
            // wmem a b: write the value from <b> into memory at address <a>
            Opcode::Wmem => {
                let address = vm.resolve_value(1)? as usize;
                let val = vm.resolve_value(2)?;
                vm.write_memory(address, val)?;
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

#[cfg(test)]
mod tests {
    use crate::vm::error::VMFault;
    use crate::vm::executor::memory_ops::MemoryOperations;
    use crate::vm::executor::processor::InstructionProcessor;
    use crate::vm::executor::test_support::{R0, R1, setup};
    use crate::vm::instruction::Opcode;
    use crate::vm::registers::Register;

    #[test]
    fn test_can_process() {
        let processor = MemoryOperations::new();
        assert!(processor.can_process(Opcode::Rmem));
        assert!(processor.can_process(Opcode::Wmem));
        assert!(!processor.can_process(Opcode::Set));
    }

    #[test]
    fn test_rmem() {
        let (mut vm, _console, ports) = setup(&[15, R0, 3, 4242]);
        MemoryOperations::new()
            .process(&mut vm, &ports, Opcode::Rmem)
            .unwrap();
        assert_eq!(vm.registers.get(Register::R0), 4242);
    }

    #[test]
    fn test_wmem() {
        let (mut vm, _console, ports) = setup(&[16, R1, 31]);
        vm.registers.set(Register::R1, 1000);
        MemoryOperations::new()
            .process(&mut vm, &ports, Opcode::Wmem)
            .unwrap();
        assert_eq!(vm.memory[1000], 31);
    }

    #[test]
    fn test_wmem_can_rewrite_program() {
        let (mut vm, _console, ports) = setup(&[16, 0, 21]);
        MemoryOperations::new()
            .process(&mut vm, &ports, Opcode::Wmem)
            .unwrap();
        assert_eq!(vm.memory[0], 21);
    }

    #[test]
    fn test_rmem_out_of_range_address() {
        // A register can hold a raw word loaded from memory that is not a valid address
        let (mut vm, _console, ports) = setup(&[15, R0, R1]);
        vm.registers.set(Register::R1, 40000);
        let result = MemoryOperations::new().process(&mut vm, &ports, Opcode::Rmem);
        assert_eq!(result, Err(VMFault::AddressOutOfRange { address: 40000 }));
    }
}
