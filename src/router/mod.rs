//! The dispatcher and the process-wide registries it consults.
//!
//! A [`LogRouter`] owns the handler registry, the fatal masks, the writer
//! slot and the print slots behind one coarse lock. Dispatch snapshots what it
//! needs under a read lock and calls user code with the lock released.

pub mod allowlist;
pub mod console;
pub mod fatal;
pub mod handlers;
pub mod print;
pub mod writer;

pub use allowlist::{AllowlistSource, DEBUG_DOMAINS_ENV, DomainFilter, EnvAllowlist, FixedAllowlist};
pub use console::{
    CaptureConsole, Console, FatalEvent, FatalPanic, PanicTerminator, ProcessAbort, StdConsole,
    Terminator,
};
pub use fatal::FatalMasks;
pub use handlers::{HandlerPolicy, HandlerRegistry, LogHandler, LogRecord};
pub use print::{PrintFunc, PrintSlots};
pub use writer::{DestroyNotify, JsonWriter, LogWriter, TracingWriter, WriterOutput};

use crate::domain::{FieldSet, FieldSetBuilder, FieldValue, HandlerId, LevelMask, LogLevel, RouterError};
use crate::DEFAULT_DOMAIN;
use crate::render::LineFormat;
use parking_lot::RwLock;
use std::cell::Cell;
use std::sync::{Arc, OnceLock};
use writer::WriterRegistration;

/// Domain used for the router's own assertion messages.
pub const LOG_DOMAIN: &str = "rask-log-router";

thread_local! {
    static DISPATCH_DEPTH: Cell<u32> = const { Cell::new(0) };
}

/// Marks the current thread as dispatching. `enter` returns `None` when the
/// thread already is, i.e. for log calls made from inside a handler or writer.
struct DispatchGuard;

impl DispatchGuard {
    fn enter() -> Option<Self> {
        DISPATCH_DEPTH.with(|depth| {
            if depth.get() > 0 {
                None
            } else {
                depth.set(1);
                Some(DispatchGuard)
            }
        })
    }
}

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        DISPATCH_DEPTH.with(|depth| depth.set(0));
    }
}

struct RouterState {
    handlers: HandlerRegistry,
    fatal: FatalMasks,
    writer: Option<WriterRegistration>,
    print: PrintSlots,
    allowlist: Arc<dyn AllowlistSource>,
    format: LineFormat,
}

impl RouterState {
    fn new(allowlist: Arc<dyn AllowlistSource>, format: LineFormat) -> Self {
        Self {
            handlers: HandlerRegistry::new(),
            fatal: FatalMasks::new(),
            writer: None,
            print: PrintSlots::default(),
            allowlist,
            format,
        }
    }
}

/// Collaborators of a [`LogRouter`].
pub struct LogRouterBuilder {
    console: Arc<dyn Console>,
    terminator: Arc<dyn Terminator>,
    allowlist: Arc<dyn AllowlistSource>,
    format: LineFormat,
}

impl Default for LogRouterBuilder {
    fn default() -> Self {
        Self {
            console: Arc::new(StdConsole),
            terminator: Arc::new(ProcessAbort),
            allowlist: Arc::new(EnvAllowlist::default()),
            format: LineFormat::current(),
        }
    }
}

impl LogRouterBuilder {
    pub fn console(mut self, console: Arc<dyn Console>) -> Self {
        self.console = console;
        self
    }

    pub fn terminator(mut self, terminator: Arc<dyn Terminator>) -> Self {
        self.terminator = terminator;
        self
    }

    pub fn allowlist(mut self, allowlist: Arc<dyn AllowlistSource>) -> Self {
        self.allowlist = allowlist;
        self
    }

    pub fn format(mut self, format: LineFormat) -> Self {
        self.format = format;
        self
    }

    pub fn build(self) -> LogRouter {
        LogRouter {
            state: RwLock::new(RouterState::new(Arc::clone(&self.allowlist), self.format.clone())),
            console: self.console,
            terminator: self.terminator,
            default_allowlist: self.allowlist,
            default_format: self.format,
        }
    }
}

/// Routes log calls to handlers, the structured writer and the console, and
/// terminates the process for fatal calls.
pub struct LogRouter {
    state: RwLock<RouterState>,
    console: Arc<dyn Console>,
    terminator: Arc<dyn Terminator>,
    default_allowlist: Arc<dyn AllowlistSource>,
    default_format: LineFormat,
}

static GLOBAL: OnceLock<LogRouter> = OnceLock::new();

impl Default for LogRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl LogRouter {
    /// Router writing to stdout/stderr, aborting on fatal calls and reading
    /// the allowlist from the environment.
    pub fn new() -> Self {
        LogRouterBuilder::default().build()
    }

    pub fn builder() -> LogRouterBuilder {
        LogRouterBuilder::default()
    }

    /// The process-wide router behind the crate's free functions.
    pub fn global() -> &'static LogRouter {
        GLOBAL.get_or_init(LogRouter::new)
    }

    /// Restores the startup state: no handlers, built-in default handler,
    /// no writer, fatal mask `{Error}` everywhere, direct print output.
    pub fn reset(&self) {
        let fresh = RouterState::new(Arc::clone(&self.default_allowlist), self.default_format.clone());
        let previous = std::mem::replace(&mut *self.state.write(), fresh);
        if let Some(WriterRegistration {
            on_replace: Some(notify),
            ..
        }) = previous.writer
        {
            notify();
        }
    }

    // ---- registries -------------------------------------------------------

    pub fn add_handler(
        &self,
        domain: &str,
        mask: impl Into<LevelMask>,
        handler: impl LogHandler + 'static,
    ) -> Result<HandlerId, RouterError> {
        let result = self
            .state
            .write()
            .handlers
            .add(domain, mask.into(), Arc::new(handler));
        result.inspect_err(|err| self.assertion_failed(err))
    }

    pub fn remove_handler(&self, domain: &str, id: HandlerId) -> Result<(), RouterError> {
        let result = self.state.write().handlers.remove(domain, id);
        result.inspect_err(|err| self.assertion_failed(err))
    }

    /// Installs the handler used when no per-domain handler matches. `None`
    /// restores the built-in handler. Returns the previous custom handler.
    pub fn set_default_handler(&self, handler: Option<Arc<dyn LogHandler>>) -> Option<Arc<dyn LogHandler>> {
        self.state.write().handlers.set_default(handler)
    }

    pub fn set_handler_policy(&self, policy: HandlerPolicy) {
        self.state.write().handlers.set_policy(policy);
    }

    /// Installs the structured writer. The previous registration's notifier
    /// runs before this returns. `None` restores the built-in console writer.
    pub fn set_writer(&self, writer: Option<Arc<dyn LogWriter>>, on_replace: Option<DestroyNotify>) {
        let registration = writer.map(|writer| WriterRegistration { writer, on_replace });
        let previous = std::mem::replace(&mut self.state.write().writer, registration);
        if let Some(WriterRegistration {
            on_replace: Some(notify),
            ..
        }) = previous
        {
            notify();
        }
        tracing::debug!("Replaced structured log writer");
    }

    /// Replaces the fatal mask of `domain`; Error is always added.
    pub fn set_fatal_mask(&self, domain: &str, mask: impl Into<LevelMask>) -> LevelMask {
        self.state.write().fatal.set_domain_mask(domain, mask.into())
    }

    /// Replaces the fatal mask shared by all domains; Error is always added.
    pub fn set_always_fatal(&self, mask: impl Into<LevelMask>) -> LevelMask {
        self.state.write().fatal.set_always_fatal(mask.into())
    }

    pub fn is_fatal(&self, domain: &str, level: LogLevel) -> bool {
        self.state.read().fatal.is_fatal(domain, level)
    }

    pub fn set_allowlist_source(&self, source: Arc<dyn AllowlistSource>) {
        self.state.write().allowlist = source;
    }

    pub fn set_program_name(&self, program_name: &str) {
        self.state.write().format.set_program_name(program_name);
    }

    /// Whether a call at `level` for `domain` passes the debug-domain
    /// allowlist. Only Info and Debug are ever refused.
    pub fn admits(&self, domain: &str, level: LogLevel) -> bool {
        if !level.is_verbose() {
            return true;
        }
        let source = Arc::clone(&self.state.read().allowlist);
        let raw = source.read();
        DomainFilter::parse(raw.as_deref()).admits(domain)
    }

    // ---- print redirection -----------------------------------------------

    pub fn set_print_handler(&self, sink: Option<PrintFunc>) -> Option<PrintFunc> {
        self.state.write().print.set_print(sink)
    }

    pub fn set_printerr_handler(&self, sink: Option<PrintFunc>) -> Option<PrintFunc> {
        self.state.write().print.set_printerr(sink)
    }

    pub fn print(&self, text: &str) {
        let sink = self.state.read().print.print();
        match sink {
            Some(sink) => sink(text),
            None => self.console.write_stdout(text.as_bytes()),
        }
    }

    pub fn printerr(&self, text: &str) {
        let sink = self.state.read().print.printerr();
        match sink {
            Some(sink) => sink(text),
            None => self.console.write_stderr(text.as_bytes()),
        }
    }

    // ---- dispatch ---------------------------------------------------------

    /// Legacy call: per-domain handlers, else the default handler.
    pub fn log(&self, domain: &str, level: LogLevel, message: impl AsRef<[u8]>) {
        let message = message.as_ref();
        if message.is_empty() {
            self.assertion_failed(&RouterError::EmptyMessage);
            return;
        }
        let fatal = self.is_fatal(domain, level);

        if let Some(guard) = DispatchGuard::enter() {
            let record = LogRecord::new(domain, level, message).with_fatal(fatal);
            let (handlers, default_handler) = {
                let state = self.state.read();
                (
                    state.handlers.matching(domain, level),
                    state.handlers.default_handler(),
                )
            };

            if !handlers.is_empty() {
                for handler in &handlers {
                    handler.handle(&record);
                }
            } else if self.admits(domain, level) {
                match default_handler {
                    Some(handler) => handler.handle(&record),
                    None => self.default_handler(&record),
                }
            }
            drop(guard);
        } else {
            self.fallback(domain, level, message);
        }

        if fatal {
            self.terminate(domain, level);
        }
    }

    /// Structured call built from key/value pairs and a message template.
    pub fn log_structured(&self, event: FieldSetBuilder<'_>) {
        let level = event.level();
        match event.build() {
            Ok(fields) => self.log_structured_array(level, &fields),
            Err(err) => self.assertion_failed(&err),
        }
    }

    /// Structured call with a prebuilt field set. The domain is taken from
    /// the `GLIB_DOMAIN` field. An empty set writes nothing but still goes
    /// through the fatal check.
    pub fn log_structured_array(&self, level: LogLevel, fields: &FieldSet<'_>) {
        if fields.is_empty() {
            if self.is_fatal(DEFAULT_DOMAIN, level) {
                self.terminate(DEFAULT_DOMAIN, level);
            }
            return;
        }
        let domain = fields.domain();
        let message = fields
            .message()
            .map(FieldValue::significant_bytes)
            .unwrap_or_default();
        let fatal = self.is_fatal(domain, level);

        if let Some(guard) = DispatchGuard::enter() {
            if self.admits(domain, level) {
                self.write_fields(level, fields);
            }

            let (handlers, default_handler) = {
                let state = self.state.read();
                (
                    state.handlers.matching(domain, level),
                    state.handlers.default_handler(),
                )
            };
            let record = LogRecord::new(domain, level, message).with_fatal(fatal);
            if !handlers.is_empty() {
                for handler in &handlers {
                    handler.handle(&record);
                }
            } else if let Some(handler) = default_handler {
                // The built-in default handler is skipped: the writer already
                // received these fields.
                if self.admits(domain, level) {
                    handler.handle(&record);
                }
            }
            drop(guard);
        } else {
            self.fallback(domain, level, message);
        }

        if fatal {
            self.terminate(domain, level);
        }
    }

    /// The built-in default handler: lifts the record into a field set and
    /// pushes it through the writer pipeline.
    pub fn default_handler(&self, record: &LogRecord<'_>) {
        let fields = FieldSet::for_message(record.domain(), record.level(), record.message_bytes());
        self.write_fields(record.level(), &fields);
    }

    /// Hands `fields` to the installed writer, falling back to the built-in
    /// console writer when there is none or it declines.
    pub fn write_fields(&self, level: LogLevel, fields: &FieldSet<'_>) {
        let writer = self
            .state
            .read()
            .writer
            .as_ref()
            .map(|registration| Arc::clone(&registration.writer));

        let output = match writer {
            Some(writer) => writer.write(level, fields),
            None => WriterOutput::Unhandled,
        };
        if output == WriterOutput::Unhandled {
            self.write_default(level, fields);
        }
    }

    /// The built-in console writer. Error, Critical, Warning and Message go
    /// to stderr; Info, Debug and custom levels to stdout.
    pub fn write_default(&self, level: LogLevel, fields: &FieldSet<'_>) -> WriterOutput {
        let domain = fields.domain();
        if !self.admits(domain, level) {
            return WriterOutput::Handled;
        }
        let message = fields
            .message()
            .map(FieldValue::significant_bytes)
            .unwrap_or_default();
        let line = self.state.read().format.render(domain, level, message);
        self.emit(level, &line);
        WriterOutput::Handled
    }

    /// Reports a programmer error as a Critical message.
    pub fn assertion_failed(&self, err: &RouterError) {
        self.log(LOG_DOMAIN, LogLevel::Critical, err.to_string());
    }

    fn fallback(&self, domain: &str, level: LogLevel, message: &[u8]) {
        if !self.admits(domain, level) {
            return;
        }
        let line = self.state.read().format.render_recursed(domain, level, message);
        self.emit(level, &line);
    }

    fn emit(&self, level: LogLevel, line: &str) {
        if level.uses_stderr() {
            self.console.write_stderr(line.as_bytes());
        } else {
            self.console.write_stdout(line.as_bytes());
        }
    }

    fn terminate(&self, domain: &str, level: LogLevel) -> ! {
        self.console.flush();
        self.terminator.terminate(&FatalEvent {
            domain: domain.to_string(),
            level,
        })
    }
}
