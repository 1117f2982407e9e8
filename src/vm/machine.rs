// Controller surface: owns a VM, runs its engine on a dedicated thread

use std::io::Read;
use std::thread::{self, JoinHandle};

use super::engine::{Completion, Engine};
use super::error::{LoadError, VMFault, VmError};
use super::io::{self, Console};
use super::program::ProgramImage;
use super::state::VMState;
use crate::config;

/// Result of a run that did not fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub completion: Completion,
    pub steps: u64,
    pub ip: u16, // Instruction pointer when the run ended
}

type RunResult = Result<Outcome, VMFault>;

/// A virtual machine and the thread executing it.
///
/// `start` may be called once, and `wait` once after it. Anything else is a
/// programming error and panics. Dropping a running machine cancels it and
/// joins its thread.
pub struct Machine {
    engine: Option<Engine>, // Taken by `start`
    handle: Option<JoinHandle<RunResult>>,
    console: Console,
}

impl Machine {
    pub fn new(image: &ProgramImage) -> Self {
        Self::with_capacity(image, config::IO_QUEUE_CAPACITY)
    }

    /// Builds a machine whose byte queues hold `capacity` bytes each
    pub fn with_capacity(image: &ProgramImage, capacity: usize) -> Self {
        let (console, ports) = io::console(capacity);
        Machine {
            engine: Some(Engine::new(VMState::new(image), ports)),
            handle: None,
            console,
        }
    }

    /// Decodes a program image from `reader` and builds a machine for it
    pub fn load<R: Read>(reader: R) -> Result<Self, LoadError> {
        let image = ProgramImage::from_reader(reader)?;
        Ok(Self::new(&image))
    }

    /// Controller side of the byte channels
    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Begins execution on a new thread
    pub fn start(&mut self) -> Result<(), VmError> {
        let Some(mut engine) = self.engine.take() else {
            panic!("virtual machine already started");
        };

        let handle = thread::Builder::new()
            .name(config::ENGINE_THREAD_NAME.to_string())
            .spawn(move || {
                let completion = engine.run()?;
                Ok(Outcome {
                    completion,
                    steps: engine.steps(),
                    ip: engine.state().ip,
                })
            })
            .map_err(VmError::Spawn)?;

        self.handle = Some(handle);
        log::info!(target: "vm", "Virtual machine started");
        Ok(())
    }

    /// Blocks until the run ends and returns its result; may be called once
    pub fn wait(&mut self) -> Result<Outcome, VmError> {
        assert!(self.engine.is_none(), "virtual machine not started");
        let handle = self
            .handle
            .take()
            .expect("completion result already consumed");

        let outcome = handle.join().map_err(|_| VmError::EnginePanicked)??;
        log::info!(
            target: "vm",
            "Virtual machine stopped ({:?}) after {} steps",
            outcome.completion,
            outcome.steps
        );
        Ok(outcome)
    }

    /// Requests cancellation; idempotent and safe before or after start
    pub fn halt(&self) {
        self.console.signal().raise();
    }
}

impl Drop for Machine {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.halt();
            if handle.join().is_err() {
                log::error!(target: "vm", "Engine thread panicked");
            }
        }
    }
}
