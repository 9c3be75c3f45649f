//! The mutable state of one processing run.
//!
//! [`ProcessContext`] owns the connection stack, the connectable stack, the
//! table stack and the loop guard, and routes every sink call through the
//! innermost connection. The operations on it are spread over
//! `connection.rs`, `table.rs`, `flow.rs` and `driver.rs`.

use crate::config::ProcessConfig;
use crate::connection::{Connectable, Connection, TargetId, Targets};
use crate::diagnostic::{Diagnostic, DiagnosticKind, Messenger, Severity};
use crate::processor::ProcessStats;
use crate::rule::{Mode, RuleMatcher, Specificity};
use crate::table::TableFrame;
use galley_fot::{FotBuilder, PageType};
use galley_grove::GroveNode;
use galley_style::{Style, StyleResolver};
use galley_types::{Location, NodeId};
use std::collections::VecDeque;
use std::sync::Arc;

/// A node being processed in a mode, as recorded by the loop guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardEntry {
    pub node_index: u64,
    pub grove_index: u32,
    pub mode: Mode,
}

pub struct ProcessContext<'a, N: GroveNode> {
    pub(crate) matcher: &'a dyn RuleMatcher<N>,
    pub(crate) resolver: &'a dyn StyleResolver,
    pub(crate) config: &'a ProcessConfig,
    messenger: &'a mut dyn Messenger,
    pub(crate) targets: Targets<'a>,
    pub(crate) connections: Vec<Connection>,
    pub(crate) connectables: Vec<Connectable>,
    /// Recorders for principal-port content written below the flow object
    /// that declared the label, indexed by that flow object's level.
    pub(crate) principal_port_queues: Vec<VecDeque<TargetId>>,
    pub(crate) flow_object_level: usize,
    pub(crate) tables: Vec<TableFrame>,
    pub(crate) node_guard: Vec<GuardEntry>,
    pub(crate) current_node: Option<N>,
    pub(crate) current_mode: Mode,
    pub(crate) specificity: Specificity,
    pub(crate) location: Option<Location>,
    pub(crate) page_type: Option<PageType>,
    pub(crate) stats: ProcessStats,
    errors: usize,
}

impl<'a, N: GroveNode> ProcessContext<'a, N> {
    pub fn new(
        matcher: &'a dyn RuleMatcher<N>,
        resolver: &'a dyn StyleResolver,
        config: &'a ProcessConfig,
        sink: &'a mut dyn FotBuilder,
        messenger: &'a mut dyn Messenger,
    ) -> Self {
        Self {
            matcher,
            resolver,
            config,
            messenger,
            targets: Targets::new(sink),
            connections: vec![Connection::root()],
            connectables: Vec::new(),
            principal_port_queues: Vec::new(),
            flow_object_level: 0,
            tables: Vec::new(),
            node_guard: Vec::new(),
            current_node: None,
            current_mode: Mode::named(config.initial_mode.as_str()),
            specificity: Specificity::default(),
            location: None,
            page_type: None,
            stats: ProcessStats::default(),
            errors: 0,
        }
    }

    /// The sink of the innermost connection.
    pub fn sink(&mut self) -> &mut dyn FotBuilder {
        let target = self.current_target();
        self.targets.get(target)
    }

    pub(crate) fn current_target(&self) -> TargetId {
        self.current_connection().target
    }

    pub(crate) fn current_connection(&self) -> &Connection {
        self.connections
            .last()
            .unwrap_or_else(|| panic!("connection stack is empty"))
    }

    pub(crate) fn current_connection_mut(&mut self) -> &mut Connection {
        self.connections
            .last_mut()
            .unwrap_or_else(|| panic!("connection stack is empty"))
    }

    pub fn current_node(&self) -> Option<&N> {
        self.current_node.as_ref()
    }

    pub(crate) fn current_node_id(&self) -> Option<NodeId> {
        self.current_node.as_ref().map(GroveNode::id)
    }

    pub fn current_mode(&self) -> &Mode {
        &self.current_mode
    }

    /// Pushes a style onto the innermost connection's stack and applies it
    /// to the current sink.
    pub fn push_style(&mut self, style: &Arc<Style>) {
        let level = u32::try_from(self.flow_object_level).unwrap_or(u32::MAX);
        let resolver = self.resolver;
        let target = self.current_target();
        let connection = self
            .connections
            .last_mut()
            .unwrap_or_else(|| panic!("connection stack is empty"));
        resolver.push(
            &mut connection.style_stack,
            style,
            level,
            self.targets.get(target),
        );
    }

    pub fn pop_style(&mut self) {
        let resolver = self.resolver;
        let target = self.current_target();
        let connection = self
            .connections
            .last_mut()
            .unwrap_or_else(|| panic!("connection stack is empty"));
        resolver.pop(&mut connection.style_stack, self.targets.get(target));
    }

    pub fn start_flow_obj(&mut self) {
        self.flow_object_level += 1;
    }

    /// Leaves a flow object and flushes principal-port content recorded for
    /// the level being returned to, oldest first.
    pub fn end_flow_obj(&mut self) {
        self.flow_object_level = self
            .flow_object_level
            .checked_sub(1)
            .unwrap_or_else(|| panic!("end_flow_obj without a matching start_flow_obj"));
        let level = self.flow_object_level;
        let Some(queue) = self.principal_port_queues.get_mut(level) else {
            return;
        };
        if queue.is_empty() {
            return;
        }
        let pending = std::mem::take(queue);
        log::trace!(
            "Flushing {} deferred principal-port recorders at level {}",
            pending.len(),
            level
        );
        let dest = self.current_target();
        for save in pending {
            self.targets.emit(save, dest);
        }
    }

    pub(crate) fn report(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            kind,
            message: message.into(),
            node: self.current_node_id(),
            location: self.location.clone(),
        };
        if diagnostic.severity() == Severity::Error {
            self.errors += 1;
        }
        self.stats.diagnostics += 1;
        self.messenger.message(diagnostic);
    }

    pub fn flow_object_level(&self) -> usize {
        self.flow_object_level
    }

    pub fn connection_depth(&self) -> usize {
        self.connections.len()
    }

    pub fn connectable_depth(&self) -> usize {
        self.connectables.len()
    }

    /// How many further closes the innermost connection will swallow for
    /// labels that matched nothing.
    pub fn swallow_count(&self) -> u32 {
        self.current_connection().n_bad_follow
    }

    pub fn guard_depth(&self) -> usize {
        self.node_guard.len()
    }

    pub fn table(&self) -> Option<&TableFrame> {
        self.tables.last()
    }

    pub fn stats(&self) -> &ProcessStats {
        &self.stats
    }

    /// Ends the run, returning its statistics and the number of error
    /// diagnostics.
    ///
    /// # Panics
    /// Panics if any scope is still open.
    pub fn finish(self) -> (ProcessStats, usize) {
        assert_eq!(
            self.connections.len(),
            1,
            "connections left open at end of processing"
        );
        assert!(
            self.connectables.is_empty(),
            "ports left pushed at end of processing"
        );
        assert_eq!(self.flow_object_level, 0, "flow objects left open");
        assert!(self.tables.is_empty(), "tables left open");
        (self.stats, self.errors)
    }
}
