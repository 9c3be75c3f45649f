//! The node driver: rule dispatch, sosofo interpretation and the
//! process-node loop guard.

use crate::context::{GuardEntry, ProcessContext};
use crate::diagnostic::DiagnosticKind;
use crate::rule::{Mode, Rule, RuleAction};
use crate::sosofo::{EvalContext, EvalValue, Sosofo, SosofoExpr};
use galley_grove::{GroveNode, NodeKind};
use galley_style::Style;
use std::sync::Arc;

impl<'a, N: GroveNode> ProcessContext<'a, N> {
    pub fn process_sosofo(&mut self, sosofo: &Sosofo<N>) {
        match sosofo {
            Sosofo::Empty => {}
            Sosofo::Append(items) => {
                for item in items {
                    self.process_sosofo(item);
                }
            }
            Sosofo::Literal(text) => self.sink().characters(text),
            Sosofo::ProcessChildren { mode } => {
                let mode = self.mode_or_current(mode);
                self.process_children(&mode);
            }
            Sosofo::ProcessChildrenTrim { mode } => {
                let mode = self.mode_or_current(mode);
                self.process_children_trim(&mode);
            }
            Sosofo::ProcessNode { node, mode } => {
                let mode = self.mode_or_current(mode);
                self.process_node_safe(node, &mode);
            }
            Sosofo::ProcessNodeList { nodes, mode } => {
                let mode = self.mode_or_current(mode);
                for node in nodes {
                    self.process_node_safe(node, &mode);
                }
            }
            Sosofo::NextMatch { style } => self.next_match(style.as_ref()),
            Sosofo::Label { label, content } => {
                self.open_connection(label);
                self.process_sosofo(content);
                self.close_connection();
            }
            Sosofo::DiscardLabeled { label, content } => {
                self.start_discard_labeled(label.clone());
                self.process_sosofo(content);
                self.end_discard_labeled();
            }
            Sosofo::PageTypeTest {
                test,
                if_true,
                if_false,
            } => {
                if let Some(page_type) = self.page_type {
                    let branch = if test.matches(page_type) {
                        if_true
                    } else {
                        if_false
                    };
                    self.process_sosofo(branch);
                }
            }
            Sosofo::PageNumber => self.sink().page_number(),
            Sosofo::CurrentNodePageNumber => {
                let node = self.current_node_id().unwrap_or_default();
                self.sink().current_node_page_number(node);
            }
            Sosofo::Deferred(expr) => self.eval_and_process(expr.as_ref(), false),
            Sosofo::FlowObject(fo) => self.process_flow_object(fo),
        }
    }

    fn mode_or_current(&self, mode: &Option<Mode>) -> Mode {
        mode.clone().unwrap_or_else(|| self.current_mode.clone())
    }

    /// Processes a node in a mode: character data goes straight to the
    /// sink, anything else through the first matching rule, or through its
    /// children when no rule matches.
    ///
    /// `chunk` delivers a whole text chunk; otherwise only its first
    /// character.
    pub fn process_node(&mut self, node: &N, mode: &Mode, chunk: bool) {
        self.stats.nodes_processed += 1;
        if let Ok(text) = node.char_chunk() {
            let text = if chunk {
                text
            } else {
                &text[..text.chars().next().map_or(0, char::len_utf8)]
            };
            self.sink().characters_from_node(node.id(), text);
            return;
        }

        let saved_node = self.current_node.replace(node.clone());
        let saved_mode = std::mem::replace(&mut self.current_mode, mode.clone());
        let saved_specificity = std::mem::take(&mut self.specificity);
        let saved_location = self.location.take();

        self.sink().start_node(node.id(), mode.name());
        let matcher = self.matcher;
        match matcher.find_match(node, mode, &mut self.specificity) {
            Some(rule) => self.apply_rule(rule, true),
            None => self.process_children(mode),
        }
        self.sink().end_node();

        self.current_node = saved_node;
        self.current_mode = saved_mode;
        self.specificity = saved_specificity;
        self.location = saved_location;
    }

    /// [`process_node`](Self::process_node) that refuses to re-enter a
    /// node already being processed in the same mode.
    pub fn process_node_guarded(&mut self, node: &N, mode: &Mode, chunk: bool) {
        if node.kind() == NodeKind::Text {
            self.process_node(node, mode, chunk);
            return;
        }
        let entry = GuardEntry {
            node_index: node.node_index(),
            grove_index: node.grove_index(),
            mode: mode.clone(),
        };
        if self.node_guard.contains(&entry) {
            self.report(
                DiagnosticKind::ProcessNodeLoop,
                format!(
                    "node {} is already being processed in mode '{}'",
                    node.id(),
                    mode
                ),
            );
            return;
        }
        self.node_guard.push(entry);
        self.stats.max_guard_depth = self.stats.max_guard_depth.max(self.node_guard.len());
        self.process_node(node, mode, chunk);
        self.node_guard.pop();
    }

    fn process_node_safe(&mut self, node: &N, mode: &Mode) {
        let chunk = self.config.chunk_text;
        if self.config.guard_process_node {
            self.process_node_guarded(node, mode, chunk);
        } else {
            self.process_node(node, mode, chunk);
        }
    }

    pub fn process_children(&mut self, mode: &Mode) {
        let Some(current) = self.current_node.clone() else {
            return;
        };
        let chunk = self.config.chunk_text;
        match current.first_child() {
            Ok(first) => {
                let mut next = Some(first);
                while let Some(child) = next {
                    self.process_node(&child, mode, chunk);
                    next = child.next_chunk_sibling().ok();
                }
            }
            Err(_) if current.kind() == NodeKind::Root => {
                if let Ok(element) = current.document_element() {
                    self.process_node(&element, mode, chunk);
                }
            }
            Err(_) => {}
        }
    }

    /// Processes the children with whitespace trimmed from the edges: blank
    /// leading and trailing text chunks are skipped, the first and last
    /// remaining chunks are trimmed.
    pub fn process_children_trim(&mut self, mode: &Mode) {
        let Some(current) = self.current_node.clone() else {
            return;
        };
        let children: Vec<N> = current.children().collect();
        let blank = |n: &N| n.char_chunk().is_ok_and(|t| t.trim().is_empty());
        let Some(first) = children.iter().position(|c| !blank(c)) else {
            return;
        };
        let last = children.iter().rposition(|c| !blank(c)).unwrap_or(first);
        let chunk = self.config.chunk_text;
        for (index, child) in children.iter().enumerate().take(last + 1).skip(first) {
            match child.char_chunk() {
                Ok(text) => {
                    let mut text = text;
                    if index == first {
                        text = text.trim_start();
                    }
                    if index == last {
                        text = text.trim_end();
                    }
                    self.stats.nodes_processed += 1;
                    self.sink().characters_from_node(child.id(), text);
                }
                Err(_) => self.process_node(child, mode, chunk),
            }
        }
    }

    /// Applies the next less specific rule to the current node, or its
    /// children when none is left. An extra style wraps the result in a
    /// sequence.
    pub fn next_match(&mut self, style: Option<&Arc<Style>>) {
        let Some(node) = self.current_node.clone() else {
            return;
        };
        let mode = self.current_mode.clone();
        let saved_specificity = self.specificity;
        let saved_location = self.location.clone();
        if let Some(style) = style {
            self.push_style(style);
            self.sink().start_sequence();
        }
        let matcher = self.matcher;
        match matcher.find_match(&node, &mode, &mut self.specificity) {
            Some(rule) => self.apply_rule(rule, false),
            None => self.process_children(&mode),
        }
        if style.is_some() {
            self.sink().end_sequence();
            self.pop_style();
        }
        self.specificity = saved_specificity;
        self.location = saved_location;
    }

    fn apply_rule(&mut self, rule: &Rule<N>, fallback: bool) {
        self.location = rule.location.clone();
        match &rule.action {
            RuleAction::Sosofo(sosofo) => self.process_sosofo(sosofo),
            RuleAction::Expression(expr) => self.eval_and_process(expr.as_ref(), fallback),
        }
    }

    /// Evaluates deferred content and processes the sosofo it yields.
    ///
    /// A failed rule body in the initial mode still processes the node's
    /// children when `fallback` is set.
    fn eval_and_process(&mut self, expr: &dyn SosofoExpr<N>, fallback: bool) {
        let Some(node) = self.current_node.clone() else {
            self.report(DiagnosticKind::EvalFailed, "no current node to evaluate against");
            return;
        };
        let mode = self.current_mode.clone();
        let result = expr.eval(&EvalContext {
            node: &node,
            mode: &mode,
            page_type: self.page_type,
        });
        match result {
            Ok(EvalValue::Sosofo(sosofo)) => self.process_sosofo(&sosofo),
            Ok(EvalValue::Other(found)) => self.report(
                DiagnosticKind::NotASosofo,
                format!("expected a sosofo, found {found}"),
            ),
            Err(err) => {
                self.report(DiagnosticKind::EvalFailed, err.to_string());
                if fallback && mode.is_initial() {
                    self.process_children(&mode);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProcessConfig;
    use crate::diagnostic::CollectingMessenger;
    use crate::error::EvalError;
    use crate::rule::{RulePattern, RuleTable};
    use galley_fot::SaveFotBuilder;
    use galley_grove::testing::{GroveBuilder, GroveRef, InMemoryGrove};
    use galley_style::InheritedStyleResolver;

    fn names(save: &SaveFotBuilder) -> Vec<String> {
        save.commands().iter().map(|c| c.to_string()).collect()
    }

    fn process<'g>(
        grove: &'g InMemoryGrove,
        rules: &RuleTable<GroveRef<'g>>,
        config: &ProcessConfig,
    ) -> (SaveFotBuilder, CollectingMessenger) {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut sink = SaveFotBuilder::new();
        let mut messenger = CollectingMessenger::new();
        {
            let mut cx = ProcessContext::new(
                rules,
                &InheritedStyleResolver,
                config,
                &mut sink,
                &mut messenger,
            );
            cx.process_node(&grove.root(), &Mode::initial(), config.chunk_text);
            cx.finish();
        }
        (sink, messenger)
    }

    #[test]
    fn unmatched_nodes_process_their_children() {
        let grove = GroveBuilder::new()
            .element("doc", |b| b.text("hi"))
            .finish();
        let (sink, messenger) = process(&grove, &RuleTable::new(), &ProcessConfig::default());
        assert_eq!(
            names(&sink),
            vec![
                "start_node(#0:0)",
                "start_node(#0:1)",
                "characters_from_node(#0:2, \"hi\")",
                "end_node",
                "end_node"
            ]
        );
        assert!(messenger.is_empty());
    }

    #[test]
    fn unchunked_text_delivers_first_character() {
        let grove = GroveBuilder::new()
            .element("doc", |b| b.text("éa"))
            .finish();
        let config = ProcessConfig {
            chunk_text: false,
            ..ProcessConfig::default()
        };
        let (sink, _) = process(&grove, &RuleTable::new(), &config);
        assert!(names(&sink).contains(&"characters_from_node(#0:2, \"é\")".to_string()));
    }

    #[test]
    fn next_match_falls_through_to_less_specific_rule() {
        let grove = GroveBuilder::new()
            .element("doc", |b| b.attribute("id", "d").text("x"))
            .finish();
        let rules = RuleTable::new()
            .with(
                Mode::initial(),
                RulePattern::Id("d".into()),
                Rule::sosofo(Sosofo::append([
                    Sosofo::literal("["),
                    Sosofo::NextMatch { style: None },
                    Sosofo::literal("]"),
                ])),
            )
            .element("doc", Sosofo::literal("element"));
        let (sink, _) = process(&grove, &rules, &ProcessConfig::default());
        let out: Vec<String> = names(&sink)
            .into_iter()
            .filter(|n| n.starts_with("characters"))
            .collect();
        assert_eq!(
            out,
            vec![
                "characters(\"[\")",
                "characters(\"element\")",
                "characters(\"]\")"
            ]
        );
    }

    #[test]
    fn failed_expression_in_initial_mode_processes_children() {
        let grove = GroveBuilder::new()
            .element("doc", |b| b.text("body"))
            .finish();
        let rules = RuleTable::new().with(
            Mode::initial(),
            RulePattern::Element("doc".into()),
            Rule::expression(|_| Err(EvalError::failed("unbound variable"))),
        );
        let (sink, messenger) = process(&grove, &rules, &ProcessConfig::default());
        assert_eq!(messenger.count(DiagnosticKind::EvalFailed), 1);
        assert!(names(&sink).contains(&"characters_from_node(#0:2, \"body\")".to_string()));
    }

    #[test]
    fn non_sosofo_result_is_dropped() {
        let grove = GroveBuilder::new()
            .element("doc", |b| b.text("body"))
            .finish();
        let rules = RuleTable::new().element(
            "doc",
            Sosofo::deferred(|_| Ok(EvalValue::Other("number 42".to_string()))),
        );
        let (sink, messenger) = process(&grove, &rules, &ProcessConfig::default());
        assert_eq!(messenger.count(DiagnosticKind::NotASosofo), 1);
        assert!(!names(&sink).iter().any(|n| n.contains("body")));
    }

    #[test]
    fn trim_skips_blank_edges() {
        let grove = GroveBuilder::new()
            .element("doc", |b| {
                b.text("  ")
                    .empty_element("br")
                    .text("  a b  ")
                    .empty_element("br")
                    .text(" \n")
            })
            .finish();
        let rules = RuleTable::new().element(
            "doc",
            Sosofo::ProcessChildrenTrim { mode: None },
        );
        let (sink, _) = process(&grove, &rules, &ProcessConfig::default());
        let text: Vec<String> = names(&sink)
            .into_iter()
            .filter(|n| n.starts_with("characters"))
            .collect();
        assert_eq!(text, vec!["characters_from_node(#0:4, \"  a b  \")"]);
    }

    #[test]
    fn page_type_test_outside_headers_produces_nothing() {
        let grove = GroveBuilder::new().element("doc", |b| b).finish();
        let rules = RuleTable::new().element(
            "doc",
            Sosofo::PageTypeTest {
                test: crate::sosofo::PageTest::FirstPage,
                if_true: Box::new(Sosofo::literal("first")),
                if_false: Box::new(Sosofo::literal("other")),
            },
        );
        let (sink, _) = process(&grove, &rules, &ProcessConfig::default());
        assert!(!names(&sink).iter().any(|n| n.starts_with("characters")));
    }
}
