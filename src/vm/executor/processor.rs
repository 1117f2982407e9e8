use crate::vm::error::VMFault;
use crate::vm::instruction::Opcode;
use crate::vm::io::IoPorts;
use crate::vm::state::VMState;

/// What the engine does with the instruction pointer after an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Fall through to the next instruction
    Next,
    /// Continue at the given address without advancing
    Jump(u16),
    /// Stop normally
    Halt,
    /// Stop because cancellation was observed
    Cancel,
}

/// A family of instructions the engine can delegate to
pub trait InstructionProcessor: Send + Sync {
    fn can_process(&self, opcode: Opcode) -> bool;

    fn process(&self, vm: &mut VMState, ports: &IoPorts, opcode: Opcode) -> Result<Step, VMFault>;
}
