//! Output streams and process termination used by the router.

use parking_lot::Mutex;
use std::io::Write;

/// The two character streams the built-in renderers write to.
pub trait Console: Send + Sync {
    fn write_stdout(&self, bytes: &[u8]);
    fn write_stderr(&self, bytes: &[u8]);
    fn flush(&self) {}
}

/// Writes straight to the process' stdout and stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdConsole;

impl Console for StdConsole {
    fn write_stdout(&self, bytes: &[u8]) {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(bytes);
        let _ = out.flush();
    }

    fn write_stderr(&self, bytes: &[u8]) {
        let mut err = std::io::stderr().lock();
        let _ = err.write_all(bytes);
        let _ = err.flush();
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();
    }
}

/// In-memory console, for asserting on rendered output.
#[derive(Debug, Default)]
pub struct CaptureConsole {
    stdout: Mutex<Vec<u8>>,
    stderr: Mutex<Vec<u8>>,
}

impl CaptureConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.stdout.lock()).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.stderr.lock()).into_owned()
    }

    pub fn clear(&self) {
        self.stdout.lock().clear();
        self.stderr.lock().clear();
    }
}

impl Console for CaptureConsole {
    fn write_stdout(&self, bytes: &[u8]) {
        self.stdout.lock().extend_from_slice(bytes);
    }

    fn write_stderr(&self, bytes: &[u8]) {
        self.stderr.lock().extend_from_slice(bytes);
    }
}

/// What the router knows about the call that turned out to be fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatalEvent {
    pub domain: String,
    pub level: crate::LogLevel,
}

/// Ends the process after a fatal log call.
pub trait Terminator: Send + Sync {
    fn terminate(&self, event: &FatalEvent) -> !;
}

/// Abnormal termination through `abort()`, after flushing the standard streams.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessAbort;

impl Terminator for ProcessAbort {
    fn terminate(&self, _event: &FatalEvent) -> ! {
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();
        std::process::abort()
    }
}

/// Payload carried by the panic raised by [`PanicTerminator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatalPanic(pub FatalEvent);

/// Unwinds with a [`FatalPanic`] payload instead of aborting, so in-process
/// harnesses can observe fatal calls with `catch_unwind`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanicTerminator;

impl Terminator for PanicTerminator {
    fn terminate(&self, event: &FatalEvent) -> ! {
        std::panic::panic_any(FatalPanic(event.clone()))
    }
}
