//! Ports, labels and the connection stack.
//!
//! Every sink call goes to the innermost [`Connection`]. Labelled content
//! opens a connection to a port or principal port of an enclosing flow
//! object, found by scanning the connectable stack innermost first. A port
//! accepts one writer at a time; later writers get a recorder that is
//! replayed into the port, in arrival order, once the port is free.

use crate::context::ProcessContext;
use crate::diagnostic::DiagnosticKind;
use crate::sosofo::ContentMap;
use galley_fot::{FotBuilder, IgnoreFotBuilder, SaveFotBuilder};
use galley_grove::GroveNode;
use galley_style::StyleStack;
use galley_types::Symbol;
use std::collections::VecDeque;

/// Where a connection's output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TargetId {
    /// The sink the run was started with.
    Root,
    /// A recorder owned by [`Targets`].
    Save(usize),
    /// Output is dropped.
    Ignore,
}

/// Owns every recorder of a run; connections refer to them by id.
///
/// Slots of emitted recorders are reused, so an id must not outlive the
/// `emit` that retires it.
pub(crate) struct Targets<'a> {
    root: &'a mut dyn FotBuilder,
    saves: Vec<Option<SaveFotBuilder>>,
    free: Vec<usize>,
    ignore: IgnoreFotBuilder,
}

impl<'a> Targets<'a> {
    pub(crate) fn new(root: &'a mut dyn FotBuilder) -> Self {
        Self {
            root,
            saves: Vec::new(),
            free: Vec::new(),
            ignore: IgnoreFotBuilder,
        }
    }

    pub(crate) fn alloc(&mut self, save: SaveFotBuilder) -> TargetId {
        if let Some(index) = self.free.pop() {
            self.saves[index] = Some(save);
            return TargetId::Save(index);
        }
        self.saves.push(Some(save));
        TargetId::Save(self.saves.len() - 1)
    }

    /// Recorder slots allocated so far, live or free.
    pub(crate) fn capacity(&self) -> usize {
        self.saves.len()
    }

    pub(crate) fn get(&mut self, id: TargetId) -> &mut dyn FotBuilder {
        match id {
            TargetId::Root => &mut *self.root,
            TargetId::Ignore => &mut self.ignore,
            TargetId::Save(index) => self.saves[index]
                .as_mut()
                .unwrap_or_else(|| panic!("recorder {index} written after it was emitted")),
        }
    }

    fn take(&mut self, id: TargetId) -> SaveFotBuilder {
        match id {
            TargetId::Save(index) => {
                let save = self.saves[index]
                    .take()
                    .unwrap_or_else(|| panic!("recorder {index} emitted twice"));
                self.free.push(index);
                save
            }
            other => panic!("{other:?} is not a recorder"),
        }
    }

    /// Replays a recorder into `dest` and retires it.
    pub(crate) fn emit(&mut self, source: TargetId, dest: TargetId) {
        let save = self.take(source);
        save.emit(self.get(dest));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PortRef {
    pub(crate) connectable: usize,
    pub(crate) port: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct Connection {
    pub(crate) target: TargetId,
    pub(crate) style_stack: StyleStack,
    pub(crate) port: Option<PortRef>,
    /// One past the index of the connectable this connection writes into.
    pub(crate) connectable_level: usize,
    /// Closes still owed by labels that matched nothing.
    pub(crate) n_bad_follow: u32,
    /// Whether opening this connection issued a `start_node`.
    pub(crate) node_scope: bool,
}

impl Connection {
    pub(crate) fn root() -> Self {
        Self {
            target: TargetId::Root,
            style_stack: StyleStack::new(),
            port: None,
            connectable_level: 0,
            n_bad_follow: 0,
            node_scope: false,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Port {
    pub(crate) name: Symbol,
    pub(crate) labels: Vec<Symbol>,
    pub(crate) target: TargetId,
    /// Open connections writing to this port, the direct writer included.
    pub(crate) connected: u32,
    pub(crate) save_queue: VecDeque<TargetId>,
}

impl Port {
    pub(crate) fn new(name: Symbol, target: TargetId) -> Self {
        Self {
            labels: vec![name.clone()],
            name,
            target,
            connected: 0,
            save_queue: VecDeque::new(),
        }
    }
}

/// The ports a flow object exposes to labelled content below it.
#[derive(Debug, Clone)]
pub(crate) struct Connectable {
    pub(crate) ports: Vec<Port>,
    pub(crate) principal_port_labels: Vec<Symbol>,
    pub(crate) style_stack: StyleStack,
    pub(crate) flow_object_level: usize,
}

impl<'a, N: GroveNode> ProcessContext<'a, N> {
    /// Allocates a recorder for content that cannot reach its destination
    /// yet, tagged with the current node so the replay keeps its identity.
    pub(crate) fn new_recorder(&mut self) -> TargetId {
        self.stats.deferred_recorders += 1;
        let save = match &self.current_node {
            Some(node) => SaveFotBuilder::tagged(node.id(), self.current_mode.name()),
            None => SaveFotBuilder::new(),
        };
        self.targets.alloc(save)
    }

    /// Redirects output to the port or principal port labelled `label`.
    ///
    /// When nothing carries the label the output stays where it was and the
    /// matching [`close_connection`](Self::close_connection) is swallowed.
    pub fn open_connection(&mut self, label: &Symbol) {
        let hit = self
            .connectables
            .iter()
            .enumerate()
            .rev()
            .find_map(|(index, connectable)| {
                connectable
                    .ports
                    .iter()
                    .position(|p| p.labels.contains(label))
                    .map(|port| (index, Some(port)))
                    .or_else(|| {
                        connectable
                            .principal_port_labels
                            .contains(label)
                            .then_some((index, None))
                    })
            });
        let Some((index, port)) = hit else {
            self.report(
                DiagnosticKind::BadConnection,
                format!("no port or principal port is labelled '{label}'"),
            );
            self.current_connection_mut().n_bad_follow += 1;
            return;
        };

        let target = match port {
            Some(port) => self.bind_port(index, port),
            None => self.bind_principal_port(index),
        };
        log::trace!("Connection to '{}' opened on {:?}", label, target);
        let node = self.current_node_id();
        self.connections.push(Connection {
            target,
            style_stack: self.connectables[index].style_stack.clone(),
            port: port.map(|port| PortRef {
                connectable: index,
                port,
            }),
            connectable_level: index + 1,
            n_bad_follow: 0,
            node_scope: node.is_some(),
        });
        if let Some(node) = node {
            let mode = self.current_mode.name().to_string();
            self.sink().start_node(node, &mode);
        }
    }

    fn bind_port(&mut self, index: usize, port: usize) -> TargetId {
        let target = if self.connectables[index].ports[port].connected > 0 {
            let save = self.new_recorder();
            self.connectables[index].ports[port]
                .save_queue
                .push_back(save);
            save
        } else {
            self.connectables[index].ports[port].target
        };
        self.connectables[index].ports[port].connected += 1;
        target
    }

    fn bind_principal_port(&mut self, index: usize) -> TargetId {
        let level = self.connectables[index].flow_object_level;
        if level == self.flow_object_level {
            return self.current_target();
        }
        let save = self.new_recorder();
        if self.principal_port_queues.len() <= level {
            self.principal_port_queues
                .resize_with(level + 1, VecDeque::new);
        }
        self.principal_port_queues[level].push_back(save);
        save
    }

    /// Ends the innermost labelled connection.
    ///
    /// Closes owed by unmatched labels are consumed without touching the
    /// stack or any open table row. Otherwise a table row opened inside the
    /// connection is closed first.
    pub fn close_connection(&mut self) {
        let connection = self.current_connection_mut();
        if connection.n_bad_follow > 0 {
            connection.n_bad_follow -= 1;
            return;
        }

        let level = self.connectables.len();
        if self
            .tables
            .last()
            .is_some_and(|t| t.in_table_row() && t.row_connectable_level() == level)
        {
            self.end_table_row();
        }
        assert!(
            self.connections.len() > 1,
            "close_connection without a matching open_connection"
        );
        if self.current_connection().node_scope {
            self.sink().end_node();
        }
        let Some(connection) = self.connections.pop() else {
            return;
        };
        log::trace!(
            "Connection on {:?} closed (connectable level {})",
            connection.target,
            connection.connectable_level
        );
        let Some(port_ref) = connection.port else {
            return;
        };
        let port = &mut self.connectables[port_ref.connectable].ports[port_ref.port];
        port.connected -= 1;
        if port.connected == 0 && !port.save_queue.is_empty() {
            let dest = port.target;
            let queue = std::mem::take(&mut port.save_queue);
            for save in queue {
                self.targets.emit(save, dest);
            }
        }
    }

    /// Makes `targets` the destinations of ports named `names`, for labelled
    /// content processed until the matching [`pop_ports`](Self::pop_ports).
    pub(crate) fn push_ports(&mut self, names: Vec<Symbol>, targets: &[TargetId]) {
        let ports = names
            .into_iter()
            .zip(targets.iter().copied())
            .map(|(name, target)| Port::new(name, target))
            .collect();
        self.connectables.push(Connectable {
            ports,
            principal_port_labels: Vec::new(),
            style_stack: self.current_connection().style_stack.clone(),
            flow_object_level: self.flow_object_level,
        });
    }

    pub(crate) fn pop_ports(&mut self) {
        let connectable = self
            .connectables
            .pop()
            .unwrap_or_else(|| panic!("pop_ports without a matching push_ports"));
        assert!(
            connectable.ports.iter().all(|p| p.connected == 0),
            "ports popped while a connection to them is still open"
        );
    }

    /// Sends output to `target` until the matching
    /// [`pop_principal_port`](Self::pop_principal_port), keeping the current
    /// styles.
    pub(crate) fn push_principal_port(&mut self, target: TargetId) {
        let connection = Connection {
            target,
            style_stack: self.current_connection().style_stack.clone(),
            port: None,
            connectable_level: self.connectables.len(),
            n_bad_follow: 0,
            node_scope: false,
        };
        self.connections.push(connection);
    }

    pub(crate) fn pop_principal_port(&mut self) {
        assert!(
            self.connections.len() > 1,
            "pop_principal_port without a matching push_principal_port"
        );
        self.connections.pop();
    }

    /// Applies a flow object's content map to the ports it declared at the
    /// current level, creating a port-less connectable if it declared none.
    pub fn start_map_content(&mut self, map: &ContentMap) {
        let level = self.flow_object_level;
        if self
            .connectables
            .last()
            .is_none_or(|c| c.flow_object_level != level)
        {
            self.connectables.push(Connectable {
                ports: Vec::new(),
                principal_port_labels: Vec::new(),
                style_stack: self.current_connection().style_stack.clone(),
                flow_object_level: level,
            });
        }
        let mut unknown = Vec::new();
        if let Some(connectable) = self.connectables.last_mut() {
            for port in &mut connectable.ports {
                port.labels.clear();
            }
            for (label, port_name) in &map.entries {
                match port_name {
                    None => connectable.principal_port_labels.push(label.clone()),
                    Some(name) => match connectable.ports.iter_mut().find(|p| &p.name == name) {
                        Some(port) => port.labels.push(label.clone()),
                        None => unknown.push(name.clone()),
                    },
                }
            }
        }
        for name in unknown {
            self.report(
                DiagnosticKind::ContentMapBadPort,
                format!("content map names unknown port '{name}'"),
            );
        }
    }

    pub fn end_map_content(&mut self) {
        if self
            .connectables
            .last()
            .is_some_and(|c| c.ports.is_empty())
        {
            self.connectables.pop();
        }
    }

    /// Enters a scope in which content labelled `label` is dropped.
    pub fn start_discard_labeled(&mut self, label: Symbol) {
        self.start_flow_obj();
        self.connectables.push(Connectable {
            ports: vec![Port::new(label, TargetId::Ignore)],
            principal_port_labels: Vec::new(),
            style_stack: self.current_connection().style_stack.clone(),
            flow_object_level: self.flow_object_level,
        });
    }

    pub fn end_discard_labeled(&mut self) {
        self.pop_ports();
        self.end_flow_obj();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProcessConfig;
    use crate::diagnostic::CollectingMessenger;
    use crate::rule::RuleTable;
    use galley_fot::{FotCommand, SaveFotBuilder};
    use galley_grove::testing::{GroveBuilder, GroveRef};
    use galley_style::InheritedStyleResolver;

    fn names(save: &SaveFotBuilder) -> Vec<String> {
        save.commands().iter().map(|c| c.to_string()).collect()
    }

    fn run<F>(f: F) -> (SaveFotBuilder, CollectingMessenger)
    where
        F: for<'x> FnOnce(&mut ProcessContext<'x, GroveRef<'static>>),
    {
        let rules = RuleTable::new();
        let config = ProcessConfig::default();
        let mut sink = SaveFotBuilder::new();
        let mut messenger = CollectingMessenger::new();
        {
            let mut cx = ProcessContext::new(
                &rules,
                &InheritedStyleResolver,
                &config,
                &mut sink,
                &mut messenger,
            );
            f(&mut cx);
            cx.finish();
        }
        (sink, messenger)
    }

    #[test]
    fn unknown_label_swallows_exactly_one_close() {
        let (sink, messenger) = run(|cx| {
            cx.open_connection(&Symbol::from("nowhere"));
            assert_eq!(cx.swallow_count(), 1);
            assert_eq!(cx.connection_depth(), 1);
            cx.sink().characters("kept");
            cx.close_connection();
            assert_eq!(cx.swallow_count(), 0);
        });
        assert_eq!(names(&sink), vec!["characters(\"kept\")"]);
        assert_eq!(messenger.count(DiagnosticKind::BadConnection), 1);
    }

    #[test]
    fn second_writer_is_queued_until_port_is_free() {
        let (sink, _) = run(|cx| {
            let port = cx.targets.alloc(SaveFotBuilder::new());
            cx.start_flow_obj();
            cx.push_ports(vec![Symbol::from("numerator")], &[port]);

            let label = Symbol::from("numerator");
            cx.open_connection(&label);
            cx.sink().characters("A");
            cx.open_connection(&label);
            cx.sink().characters("B");
            cx.close_connection();
            cx.sink().characters("A2");
            cx.close_connection();

            cx.pop_ports();
            let dest = cx.current_target();
            cx.targets.emit(port, dest);
            cx.end_flow_obj();
            assert_eq!(cx.stats().deferred_recorders, 1);
        });
        assert_eq!(
            names(&sink),
            vec!["characters(\"A\")", "characters(\"A2\")", "characters(\"B\")"]
        );
    }

    #[test]
    fn content_map_relabels_ports_and_reports_unknown_ones() {
        let (_, messenger) = run(|cx| {
            let port = cx.targets.alloc(SaveFotBuilder::new());
            cx.start_flow_obj();
            cx.push_ports(vec![Symbol::from("numerator")], &[port]);
            cx.start_map_content(
                &ContentMap::new()
                    .port("top", "numerator")
                    .port("x", "no-such-port")
                    .principal("body"),
            );
            let connectable = &cx.connectables[0];
            assert_eq!(connectable.ports[0].labels, vec![Symbol::from("top")]);
            assert_eq!(connectable.principal_port_labels, vec![Symbol::from("body")]);

            cx.open_connection(&Symbol::from("numerator"));
            assert_eq!(cx.swallow_count(), 1);
            cx.close_connection();

            cx.end_map_content();
            assert_eq!(cx.connectable_depth(), 1);
            cx.pop_ports();
            cx.targets.take(port);
            cx.end_flow_obj();
        });
        assert_eq!(messenger.count(DiagnosticKind::ContentMapBadPort), 1);
        assert_eq!(messenger.count(DiagnosticKind::BadConnection), 1);
    }

    #[test]
    fn principal_label_at_same_level_writes_through() {
        let (sink, _) = run(|cx| {
            cx.start_flow_obj();
            cx.start_map_content(&ContentMap::new().principal("body"));
            cx.open_connection(&Symbol::from("body"));
            cx.sink().characters("direct");
            cx.close_connection();

            cx.start_flow_obj();
            cx.open_connection(&Symbol::from("body"));
            cx.sink().characters("deferred");
            cx.close_connection();
            cx.sink().characters("inner");
            cx.end_flow_obj();

            cx.end_map_content();
            assert_eq!(cx.connectable_depth(), 0);
            cx.end_flow_obj();
            assert_eq!(cx.stats().deferred_recorders, 1);
        });
        assert_eq!(
            names(&sink),
            vec![
                "characters(\"direct\")",
                "characters(\"inner\")",
                "characters(\"deferred\")"
            ]
        );
    }

    #[test]
    fn discarded_label_output_is_dropped() {
        let (sink, _) = run(|cx| {
            cx.start_discard_labeled(Symbol::from("notes"));
            cx.open_connection(&Symbol::from("notes"));
            cx.sink().characters("gone");
            cx.close_connection();
            cx.sink().characters("kept");
            cx.end_discard_labeled();
        });
        assert_eq!(sink.commands(), &[FotCommand::Characters("kept".to_string())]);
    }

    #[test]
    #[should_panic(expected = "without a matching open_connection")]
    fn unbalanced_close_panics() {
        run(|cx| cx.close_connection());
    }

    #[test]
    fn emitted_recorder_slots_are_reused() {
        let mut root = SaveFotBuilder::new();
        let mut targets = Targets::new(&mut root);
        for text in ["a", "b", "c"] {
            let id = targets.alloc(SaveFotBuilder::new());
            targets.get(id).characters(text);
            targets.emit(id, TargetId::Root);
        }
        assert_eq!(targets.capacity(), 1);

        let outer = targets.alloc(SaveFotBuilder::new());
        let inner = targets.alloc(SaveFotBuilder::new());
        assert_ne!(outer, inner);
        targets.get(inner).characters("d");
        targets.emit(inner, outer);
        targets.emit(outer, TargetId::Root);
        assert_eq!(targets.capacity(), 2);
        drop(targets);

        let text: String = root
            .commands()
            .iter()
            .filter_map(|c| match c {
                FotCommand::Characters(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(text, "abcd");
    }

    #[test]
    fn unknown_label_inside_a_row_leaves_it_open() {
        let (sink, messenger) = run(|cx| {
            cx.start_table();
            cx.start_table_row(None);
            let nowhere = Symbol::from("nowhere");
            cx.open_connection(&nowhere);
            cx.close_connection();
            assert!(cx.in_table_row());
            cx.end_table_row();
            cx.end_table();
        });
        assert_eq!(messenger.count(DiagnosticKind::BadConnection), 1);
        let rows = sink
            .commands()
            .iter()
            .filter(|c| matches!(c, FotCommand::StartTableRow))
            .count();
        assert_eq!(rows, 1);
    }
}

