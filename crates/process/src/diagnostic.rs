//! Non-fatal problems noticed while processing.
//!
//! Processing never aborts on a diagnostic. Each one is handed to a
//! [`Messenger`] and the driver carries on with the recovery the kind
//! prescribes.

use galley_types::{Location, NodeId};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A label matched no port or principal port of any enclosing flow object.
    BadConnection,
    /// A content map names a port the flow object does not have.
    ContentMapBadPort,
    /// A deferred content expression produced something other than a sosofo.
    NotASosofo,
    /// A deferred content expression failed to evaluate.
    EvalFailed,
    /// A table row, cell or column outside any table.
    NotInTable,
    /// Row spans reach past the end of a table part and filler rows are off.
    RowSpanOverflow,
    /// A node was asked to process itself, in the same mode, while still
    /// being processed.
    ProcessNodeLoop,
}

impl DiagnosticKind {
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::BadConnection
            | DiagnosticKind::NotASosofo
            | DiagnosticKind::EvalFailed
            | DiagnosticKind::ProcessNodeLoop => Severity::Error,
            DiagnosticKind::ContentMapBadPort
            | DiagnosticKind::NotInTable
            | DiagnosticKind::RowSpanOverflow => Severity::Warning,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiagnosticKind::BadConnection => "bad connection",
            DiagnosticKind::ContentMapBadPort => "bad content map port",
            DiagnosticKind::NotASosofo => "not a sosofo",
            DiagnosticKind::EvalFailed => "evaluation failed",
            DiagnosticKind::NotInTable => "not in table",
            DiagnosticKind::RowSpanOverflow => "row span overflow",
            DiagnosticKind::ProcessNodeLoop => "process-node loop",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// The node being processed when the problem was noticed.
    pub node: Option<NodeId>,
    /// The rule whose action was running, if it carries a location.
    pub location: Option<Location>,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(node) = self.node {
            write!(f, " (node {node})")?;
        }
        if let Some(location) = &self.location {
            write!(f, " at {location}")?;
        }
        Ok(())
    }
}

/// Receives diagnostics as they are raised.
pub trait Messenger {
    fn message(&mut self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMessenger;

impl Messenger for LogMessenger {
    fn message(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Warning => log::warn!("{diagnostic}"),
            Severity::Error => log::error!("{diagnostic}"),
        }
    }
}

/// Keeps every diagnostic, for inspection after a run.
#[derive(Debug, Default, Clone)]
pub struct CollectingMessenger {
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl Messenger for CollectingMessenger {
    fn message(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
