// Console channels: bounded byte queues in each direction plus the halt signal

use crossbeam_channel::{Receiver, SendTimeoutError, Sender, bounded, select};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

// How often a blocked feeder re-checks the halt flag
const FEED_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// One-shot, idempotent cancellation flag.
///
/// Raising it sets a durable flag (checked at the top of every instruction)
/// and drops a token into a single-slot wake channel so an engine blocked on
/// a byte queue wakes up.
#[derive(Debug, Clone)]
pub struct HaltSignal {
    inner: Arc<SignalInner>,
}

#[derive(Debug)]
struct SignalInner {
    raised: AtomicBool,
    wake: Sender<()>,
}

impl HaltSignal {
    fn new() -> (HaltSignal, Receiver<()>) {
        let (wake, woken) = bounded(1);
        let signal = HaltSignal {
            inner: Arc::new(SignalInner {
                raised: AtomicBool::new(false),
                wake,
            }),
        };
        (signal, woken)
    }

    /// Requests cancellation; later calls have no further effect
    pub fn raise(&self) {
        if !self.inner.raised.swap(true, Ordering::AcqRel) {
            crate::debug_io!("Halt requested");
            let _ = self.inner.wake.try_send(());
        }
    }

    pub fn is_raised(&self) -> bool {
        self.inner.raised.load(Ordering::Acquire)
    }
}

/// Why a blocking port operation did not complete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortError {
    Cancelled,
    Disconnected,
}

/// Engine side of the console
#[derive(Debug)]
pub struct IoPorts {
    input: Receiver<u8>,
    output: Option<Sender<u8>>,
    signal: HaltSignal,
    woken: Receiver<()>,
}

impl IoPorts {
    pub fn signal(&self) -> &HaltSignal {
        &self.signal
    }

    /// Blocks until a byte arrives or cancellation is requested
    pub fn read_byte(&self) -> Result<u8, PortError> {
        if self.signal.is_raised() {
            return Err(PortError::Cancelled);
        }
        select! {
            recv(self.input) -> msg => msg.map_err(|_| PortError::Disconnected),
            recv(self.woken) -> _ => Err(PortError::Cancelled),
        }
    }

    /// Blocks while the outbound queue is full, unless cancellation is requested
    pub fn write_byte(&self, byte: u8) -> Result<(), PortError> {
        if self.signal.is_raised() {
            return Err(PortError::Cancelled);
        }
        let output = self.output.as_ref().ok_or(PortError::Disconnected)?;
        select! {
            send(output, byte) -> res => res.map_err(|_| PortError::Disconnected),
            recv(self.woken) -> _ => Err(PortError::Cancelled),
        }
    }

    /// Drops the outbound sender so consumers observe end of output
    pub fn close_output(&mut self) {
        if self.output.take().is_some() {
            crate::debug_io!("Output closed");
        }
    }
}

/// Controller side of the console
#[derive(Debug, Clone)]
pub struct Console {
    input: Sender<u8>,
    output: Receiver<u8>,
    signal: HaltSignal,
}

impl Console {
    /// Sender feeding bytes to `in` instructions
    pub fn input(&self) -> Sender<u8> {
        self.input.clone()
    }

    /// Receiver yielding bytes written by `out` instructions until the run ends
    pub fn output(&self) -> Receiver<u8> {
        self.output.clone()
    }

    pub fn signal(&self) -> HaltSignal {
        self.signal.clone()
    }

    /// Queues one line of input followed by a single newline.
    ///
    /// Returns `false` if the engine has gone away or a halt was requested
    /// before the whole line was queued.
    pub fn send_line(&self, line: &[u8]) -> bool {
        for &byte in line.iter().chain(std::iter::once(&b'\n')) {
            if self.signal.is_raised() {
                return false;
            }
            loop {
                match self.input.send_timeout(byte, FEED_POLL_INTERVAL) {
                    Ok(()) => break,
                    Err(SendTimeoutError::Timeout(_)) if !self.signal.is_raised() => continue,
                    Err(_) => return false,
                }
            }
        }
        crate::debug_io!("Queued line of {} bytes", line.len() + 1);
        true
    }

    /// True once every queued input byte has been consumed
    pub fn input_drained(&self) -> bool {
        self.input.is_empty()
    }
}

/// Creates both sides of a console with `capacity` bytes buffered per direction
pub fn console(capacity: usize) -> (Console, IoPorts) {
    let (in_tx, in_rx) = bounded(capacity);
    let (out_tx, out_rx) = bounded(capacity);
    let (signal, woken) = HaltSignal::new();

    let controller = Console {
        input: in_tx,
        output: out_rx,
        signal: signal.clone(),
    };
    let ports = IoPorts {
        input: in_rx,
        output: Some(out_tx),
        signal,
        woken,
    };
    (controller, ports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn test_bytes_flow_both_ways() {
        let (console, ports) = console(8);
        assert!(console.send_line(b"hi"));
        assert_eq!(ports.read_byte(), Ok(b'h'));
        assert_eq!(ports.read_byte(), Ok(b'i'));
        assert_eq!(ports.read_byte(), Ok(b'\n'));
        assert!(console.input_drained());

        assert_eq!(ports.write_byte(b'x'), Ok(()));
        assert_eq!(console.output().recv(), Ok(b'x'));
    }

    #[test]
    fn test_raise_is_idempotent() {
        let (console, ports) = console(8);
        let signal = console.signal();
        assert!(!signal.is_raised());
        signal.raise();
        signal.raise();
        assert!(signal.is_raised());
        assert!(ports.signal().is_raised());
        assert_eq!(ports.read_byte(), Err(PortError::Cancelled));
        assert_eq!(ports.read_byte(), Err(PortError::Cancelled));
    }

    #[test]
    fn test_blocked_read_wakes_on_halt() {
        let (console, ports) = console(8);
        let signal = console.signal();
        let waker = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            signal.raise();
        });
        let started = Instant::now();
        assert_eq!(ports.read_byte(), Err(PortError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(5));
        waker.join().unwrap();
    }

    #[test]
    fn test_blocked_write_wakes_on_halt() {
        let (console, ports) = console(1);
        assert_eq!(ports.write_byte(1), Ok(()));
        let signal = console.signal();
        let waker = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            signal.raise();
        });
        assert_eq!(ports.write_byte(2), Err(PortError::Cancelled));
        waker.join().unwrap();
    }

    #[test]
    fn test_close_output_ends_stream() {
        let (console, mut ports) = console(4);
        let output = console.output();
        ports.write_byte(b'a').unwrap();
        ports.close_output();
        assert_eq!(output.recv(), Ok(b'a'));
        assert!(output.recv().is_err());
        assert_eq!(ports.write_byte(b'b'), Err(PortError::Disconnected));
    }

    #[test]
    fn test_send_line_stops_after_halt() {
        let (console, _ports) = console(1);
        console.signal().raise();
        assert!(!console.send_line(b"abc"));
    }
}
