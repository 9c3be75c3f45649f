//! Node processing for the galley formatting core.
//!
//! A [`Processor`] walks a grove, finds the construction rule for each node
//! through a [`RuleMatcher`], and interprets the resulting [`Sosofo`] into
//! calls on a [`galley_fot::FotBuilder`]. Along the way it keeps the
//! connection stack that routes labelled content to ports, the table state
//! that tracks columns and row spans, and a guard against a node
//! processing itself forever.

mod connection;
pub mod config;
pub mod context;
pub mod diagnostic;
mod driver;
pub mod error;
mod flow;
pub mod processor;
pub mod rule;
pub mod sosofo;
pub mod table;

pub use config::ProcessConfig;
pub use context::{GuardEntry, ProcessContext};
pub use diagnostic::{
    CollectingMessenger, Diagnostic, DiagnosticKind, LogMessenger, Messenger, Severity,
};
pub use error::{ConfigError, EvalError, ProcessError};
pub use processor::{ProcessStats, Processor, ProcessorBuilder};
pub use rule::{Mode, Rule, RuleAction, RuleMatcher, RulePattern, RuleTable, Specificity};
pub use sosofo::{
    ContentMap, EvalContext, EvalValue, FlowObject, FlowObjectKind, FnExpr, HeaderFooterContent,
    PageTest, Sosofo, SosofoExpr, TableCellSpec, TableColumnSpec,
};
pub use table::TableFrame;
