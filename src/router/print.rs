use std::sync::Arc;

/// Sink for plain (non-leveled) console output.
pub type PrintFunc = Arc<dyn Fn(&str) + Send + Sync>;

/// The two single-slot print sinks. `None` means direct console output.
#[derive(Default, Clone)]
pub struct PrintSlots {
    print: Option<PrintFunc>,
    printerr: Option<PrintFunc>,
}

impl PrintSlots {
    pub fn set_print(&mut self, sink: Option<PrintFunc>) -> Option<PrintFunc> {
        std::mem::replace(&mut self.print, sink)
    }

    pub fn set_printerr(&mut self, sink: Option<PrintFunc>) -> Option<PrintFunc> {
        std::mem::replace(&mut self.printerr, sink)
    }

    pub fn print(&self) -> Option<PrintFunc> {
        self.print.clone()
    }

    pub fn printerr(&self) -> Option<PrintFunc> {
        self.printerr.clone()
    }
}
