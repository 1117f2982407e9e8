// Fetch-decode-execute loop over one VMState

use super::error::VMFault;
use super::executor::{InstructionExecutor, Step};
use super::instruction::Opcode;
use super::io::IoPorts;
use super::state::{Status, VMState};

/// How a run ended without a fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// `halt`, or `ret` with an empty stack
    Halted,
    /// An external halt request was observed
    Cancelled,
}

/// Drives a single VMState until it reaches a terminal status
pub struct Engine {
    state: VMState,
    ports: IoPorts,
    executor: InstructionExecutor,
    steps: u64,
}

impl Engine {
    pub fn new(state: VMState, ports: IoPorts) -> Self {
        Engine {
            state,
            ports,
            executor: InstructionExecutor::new(),
            steps: 0,
        }
    }

    pub fn state(&self) -> &VMState {
        &self.state
    }

    /// Number of instructions executed so far
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Executes one instruction, returning the completion once the run is over
    pub fn step(&mut self) -> Result<Option<Completion>, VMFault> {
        if self.ports.signal().is_raised() {
            return Ok(Some(Completion::Cancelled));
        }

        let vm = &mut self.state;
        let address = vm.ip as usize;
        let word = vm.read_memory(address)?;
        let opcode =
            Opcode::try_from(word).map_err(|opcode| VMFault::InvalidOpcode { address, opcode })?;
        vm.size = opcode.size();

        let operands = vm.memory.get(address + 1..address + vm.size as usize).unwrap_or(&[]);
        crate::debug_instructions!(@vm.ip, "{} {:?}", opcode, operands);

        let step = self.executor.execute_instruction(vm, &self.ports, opcode)?;
        let completion = match step {
            // Interrupted before the instruction took effect
            Step::Cancel => return Ok(Some(Completion::Cancelled)),
            Step::Next => {
                vm.advance_ip();
                None
            }
            Step::Jump(target) => {
                vm.ip = target;
                None
            }
            Step::Halt => {
                vm.advance_ip();
                Some(Completion::Halted)
            }
        };
        self.steps += 1;
        Ok(completion)
    }

    /// Runs until halt, cancellation or fault.
    ///
    /// The outbound channel is closed on every exit path.
    pub fn run(&mut self) -> Result<Completion, VMFault> {
        crate::debug_vm!("Run started");
        let result = loop {
            match self.step() {
                Ok(None) => continue,
                Ok(Some(completion)) => break Ok(completion),
                Err(fault) => break Err(fault),
            }
        };
        self.ports.close_output();

        match result {
            Ok(Completion::Halted) => self.state.status = Status::Halted,
            Ok(Completion::Cancelled) => self.state.status = Status::Cancelled,
            Err(fault) => {
                log::warn!(target: "vm", "Fault after {} steps: {}", self.steps, fault);
                self.state.set_fault(fault);
            }
        }
        crate::debug_vm!("Run finished after {} steps: {:?}", self.steps, self.state.status);
        result
    }
}
