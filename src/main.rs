use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use clap::Parser;
use crossbeam_channel::Receiver;
use log::{error, info};
use synvm::config;
use synvm::logging;
use synvm::vm::io::{Console, HaltSignal};
use synvm::vm::{Completion, Machine, VmError};

// How often the stdin feeder checks whether queued input has been consumed
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

// --- Command Line Arguments ---
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Program image to run (little-endian 16-bit words).
    program: PathBuf,

    /// Debug filter to specify log topics (e.g., "vm,instructions,io")
    #[arg(long)]
    debug_filter: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Bytes buffered in each direction between the terminal and the VM.
    #[arg(long, default_value_t = config::IO_QUEUE_CAPACITY)]
    queue_capacity: usize,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init_logger(logging::parse_level(&args.log_level), args.debug_filter.clone()) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }

    let file = match File::open(&args.program) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed opening program {}: {}", args.program.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let image = match synvm::vm::ProgramImage::from_reader(BufReader::new(file)) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Failed reading program {}: {}", args.program.display(), e);
            return ExitCode::FAILURE;
        }
    };
    info!("Loaded {} words from {}", image.len(), args.program.display());

    match run(Machine::with_capacity(&image, args.queue_capacity)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Execution failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(mut vm: Machine) -> Result<(), VmError> {
    let console = vm.console().clone();
    let printer =
        spawn_printer(console.output(), console.signal(), io::stdout()).map_err(VmError::Spawn)?;
    spawn_feeder(console).map_err(VmError::Spawn)?;

    vm.start()?;
    let result = vm.wait();
    // Releases the feeder if it is still waiting on input
    vm.halt();

    match printer.join() {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("Writing output failed: {}", e),
        Err(_) => error!("Output thread panicked"),
    }

    let outcome = result?;
    if outcome.completion == Completion::Cancelled {
        info!("Program cancelled at {}", outcome.ip);
    }
    Ok(())
}

/// Prints program output until the VM closes its outbound channel.
///
/// A failed write halts the VM, otherwise it would block on a queue nobody drains.
fn spawn_printer<W>(
    output: Receiver<u8>,
    signal: HaltSignal,
    mut out: W,
) -> io::Result<JoinHandle<io::Result<()>>>
where
    W: Write + Send + 'static,
{
    thread::Builder::new().name("stdout-printer".to_string()).spawn(move || {
        let result = print_all(&output, &mut out);
        if result.is_err() {
            signal.raise();
        }
        result
    })
}

fn print_all<W: Write>(output: &Receiver<u8>, out: &mut W) -> io::Result<()> {
    for byte in output.iter() {
        out.write_all(&[byte])?;
        if byte == b'\n' || output.is_empty() {
            out.flush()?;
        }
    }
    out.flush()
}

/// Feeds stdin to the VM one line at a time, then requests a halt at end of input
fn spawn_feeder(console: Console) -> io::Result<JoinHandle<()>> {
    thread::Builder::new().name("stdin-feeder".to_string()).spawn(move || {
        let stdin = io::stdin();
        let mut reader = stdin.lock();
        let mut line = Vec::new();

        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) => break,
                Ok(_) => {
                    if line.last() == Some(&b'\n') {
                        line.pop();
                    }
                    if line.last() == Some(&b'\r') {
                        line.pop();
                    }
                    if !console.send_line(&line) {
                        return;
                    }
                }
                Err(e) => {
                    error!("Input failed: {}", e);
                    break;
                }
            }
        }

        // Let the program consume what was queued before asking it to stop
        let signal = console.signal();
        while !console.input_drained() && !signal.is_raised() {
            thread::sleep(DRAIN_POLL_INTERVAL);
        }
        info!("End of input, halting");
        signal.raise();
    })
}
