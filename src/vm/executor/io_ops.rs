use super::processor::{InstructionProcessor, Step};
use crate::vm::error::VMFault;
use crate::vm::instruction::Opcode;
use crate::vm::io::{IoPorts, PortError};
use crate::vm::state::VMState;

/// Processor for terminal input and output
pub struct IoOperations;

impl IoOperations {
    pub fn new() -> Self {
        IoOperations
    }
}

impl InstructionProcessor for IoOperations {
    fn can_process(&self, opcode: Opcode) -> bool {
        matches!(opcode, Opcode::Out | Opcode::In)
    }

    fn process(&self, vm: &mut VMState, ports: &IoPorts, opcode: Opcode) -> Result<Step, VMFault> {
        match opcode {
            // out a: write the character represented by ascii code <a> to the terminal
            Opcode::Out => {
                let byte = (vm.resolve_value(1)? & 0xFF) as u8;
                match ports.write_byte(byte) {
                    Ok(()) => {
                        log::trace!(target: "io", "out {:#04x}", byte);
                        Ok(Step::Next)
                    }
                    Err(PortError::Cancelled) => Ok(Step::Cancel),
                    Err(PortError::Disconnected) => Err(VMFault::OutputClosed {
                        address: vm.ip as usize,
                    }),
                }
            }
            // in a: read a character from the terminal and write its ascii code to <a>
            Opcode::In => match ports.read_byte() {
                Ok(byte) => {
                    log::trace!(target: "io", "in {:#04x}", byte);
                    vm.resolve_target(1, byte as u16)?;
                    Ok(Step::Next)
                }
                Err(PortError::Cancelled) => Ok(Step::Cancel),
                Err(PortError::Disconnected) => {
                    // No producer is left, so no byte can ever arrive
                    crate::debug_io!("Input exhausted at {}", vm.ip);
                    Ok(Step::Cancel)
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
    use crate::vm::executor::io_ops::IoOperations;
    use crate::vm::executor::processor::{InstructionProcessor, Step};
    use crate::vm::executor::test_support::{R0, setup};
    use crate::vm::instruction::Opcode;
    use crate::vm::registers::Register;

    #[test]
    fn test_can_process() {
        let processor = IoOperations::new();
        assert!(processor.can_process(Opcode::In));
        assert!(processor.can_process(Opcode::Out));
        assert!(!processor.can_process(Opcode::Nop));
    }

    #[test]
    fn test_out_writes_low_byte() {
        let (mut vm, console, ports) = setup(&[19, R0]);
        vm.registers.set(Register::R0, 0x141);
        let result = IoOperations::new().process(&mut vm, &ports, Opcode::Out);
        assert_eq!(result, Ok(Step::Next));
        assert_eq!(console.output().try_recv(), Ok(b'A'));
    }

    #[test]
    fn test_in_reads_into_register() {
        let (mut vm, console, ports) = setup(&[20, R0]);
        console.input().send(b'z').unwrap();
        let result = IoOperations::new().process(&mut vm, &ports, Opcode::In);
        assert_eq!(result, Ok(Step::Next));
        assert_eq!(vm.registers.get(Register::R0), b'z' as u16);
    }

    #[test]
    fn test_in_requires_register_target() {
        let (mut vm, console, ports) = setup(&[20, 5]);
        console.input().send(b'z').unwrap();
        let result = IoOperations::new().process(&mut vm, &ports, Opcode::In);
        assert!(matches!(result, Err(VMFault::NotARegister { value: 5, .. })));
    }

    #[test]
    fn test_in_cancelled() {
        let (mut vm, console, ports) = setup(&[20, R0]);
        console.signal().raise();
        let result = IoOperations::new().process(&mut vm, &ports, Opcode::In);
        assert_eq!(result, Ok(Step::Cancel));
    }

    #[test]
    fn test_in_without_producers_stops() {
        let (mut vm, console, ports) = setup(&[20, R0]);
        drop(console);
        let result = IoOperations::new().process(&mut vm, &ports, Opcode::In);
        assert_eq!(result, Ok(Step::Cancel));
    }

    #[test]
    fn test_out_after_close_faults() {
        let (mut vm, _console, mut ports) = setup(&[19, 65]);
        ports.close_output();
        let result = IoOperations::new().process(&mut vm, &ports, Opcode::Out);
        assert_eq!(result, Err(VMFault::OutputClosed { address: 0 }));
    }
}
