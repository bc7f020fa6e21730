use crate::typing::config::Method;
use std::path::PathBuf;

/// A structured diagnostic event emitted during a typing run.
///
/// Diagnostics exist for audit and debugging; they never influence behavior.
/// Renames in particular are worth recording because the canonical names are
/// what the external typers echo back, so a surprising rename is the first
/// place to look when reconciliation fails.
#[derive(Debug, Clone)]
pub enum Diagnostic {
    SegmentRenamed {
        segid: &'static str,
    },
    ResidueRenamed {
        resname: &'static str,
    },
    AtomRenamed {
        index: usize,
        old: String,
        new: String,
    },
    NetChargeDerived {
        net_charge: i32,
    },
    BackendSelected {
        method: Method,
    },
    WorkspaceOpened {
        path: PathBuf,
        persistent: bool,
    },
    ToolCompleted {
        tool: &'static str,
    },
}

pub type DiagnosticCallback<'a> = Box<dyn Fn(Diagnostic) + Send + Sync + 'a>;

/// A capability-style sink for [`Diagnostic`] events.
///
/// Callers that care about diagnostics install a callback; everyone else
/// passes a default reporter and the events vanish. This keeps the typing
/// core free of global logging state, so tests can assert on emitted events
/// without cross-test bleed.
#[derive(Default)]
pub struct DiagnosticsReporter<'a> {
    callback: Option<DiagnosticCallback<'a>>,
}

impl<'a> DiagnosticsReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: DiagnosticCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Diagnostic) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn default_reporter_swallows_events() {
        let reporter = DiagnosticsReporter::new();
        reporter.report(Diagnostic::NetChargeDerived { net_charge: 0 });
    }

    #[test]
    fn callback_receives_every_event() {
        let seen = Mutex::new(Vec::new());
        let reporter = DiagnosticsReporter::with_callback(Box::new(|event| {
            seen.lock().unwrap().push(event);
        }));

        reporter.report(Diagnostic::SegmentRenamed { segid: "L" });
        reporter.report(Diagnostic::NetChargeDerived { net_charge: -2 });
        drop(reporter);

        let events = seen.into_inner().unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[1],
            Diagnostic::NetChargeDerived { net_charge: -2 }
        ));
    }
}
