//! Processing modes and rule lookup.

use crate::error::EvalError;
use crate::sosofo::{EvalContext, EvalValue, FnExpr, Sosofo, SosofoExpr};
use galley_grove::{GroveNode, NodeKind};
use galley_types::{Location, Symbol};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A processing mode. The unnamed mode is the initial mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Mode {
    name: Option<Symbol>,
}

impl Mode {
    pub fn initial() -> Self {
        Self::default()
    }

    /// A named mode; the empty name denotes the initial mode.
    pub fn named(name: impl Into<Symbol>) -> Self {
        let name = name.into();
        Self {
            name: (!name.as_str().is_empty()).then_some(name),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_ref().map_or("", Symbol::as_str)
    }

    pub fn is_initial(&self) -> bool {
        self.name.is_none()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How far rule lookup has progressed for the node being processed.
///
/// `find_match` hands out candidates in priority order and advances the
/// rank, so `next-match` continues with the next less specific rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Specificity {
    pub rank: usize,
}

#[derive(Debug, Clone)]
pub enum RuleAction<N> {
    Sosofo(Sosofo<N>),
    Expression(Arc<dyn SosofoExpr<N>>),
}

/// A construction rule's action and where it was defined.
#[derive(Debug, Clone)]
pub struct Rule<N> {
    pub action: RuleAction<N>,
    pub location: Option<Location>,
}

impl<N> Rule<N> {
    pub fn sosofo(sosofo: Sosofo<N>) -> Self {
        Self {
            action: RuleAction::Sosofo(sosofo),
            location: None,
        }
    }

    pub fn expression<F>(f: F) -> Self
    where
        F: Fn(&EvalContext<'_, N>) -> Result<EvalValue<N>, EvalError> + 'static,
    {
        Self {
            action: RuleAction::Expression(Arc::new(FnExpr(f))),
            location: None,
        }
    }

    pub fn at(mut self, location: impl Into<Location>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Finds the rule to apply to a node.
pub trait RuleMatcher<N> {
    /// Returns the highest-priority rule not yet tried for `node` in
    /// `mode`, advancing `specificity` past it.
    fn find_match(
        &self,
        node: &N,
        mode: &Mode,
        specificity: &mut Specificity,
    ) -> Option<&Rule<N>>;
}

/// What a [`RuleTable`] rule applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RulePattern {
    /// The grove root.
    Root,
    /// Elements with this generic identifier.
    Element(Symbol),
    /// The element whose `id` attribute has this value.
    Id(String),
    /// Any element no more specific rule handles.
    Default,
}

#[derive(Debug)]
struct ModeRules<N> {
    ids: HashMap<String, Rule<N>>,
    elements: HashMap<Symbol, Rule<N>>,
    root: Option<Rule<N>>,
    default: Option<Rule<N>>,
}

impl<N> Default for ModeRules<N> {
    fn default() -> Self {
        Self {
            ids: HashMap::new(),
            elements: HashMap::new(),
            root: None,
            default: None,
        }
    }
}

impl<N: GroveNode> ModeRules<N> {
    fn matching(&self, node: &N) -> [Option<&Rule<N>>; 3] {
        let by_id = node
            .attribute_string("id")
            .ok()
            .and_then(|id| self.ids.get(id));
        let (by_kind, default) = match node.kind() {
            NodeKind::Root => (self.root.as_ref(), None),
            NodeKind::Element => (
                node.gi().and_then(|gi| self.elements.get(gi)),
                self.default.as_ref(),
            ),
            NodeKind::Text | NodeKind::Other => (None, None),
        };
        [by_id, by_kind, default]
    }
}

/// Construction rules keyed by mode and pattern.
///
/// For a node processed in a named mode the candidates are that mode's
/// rules followed by the initial mode's. Within a mode an id rule beats an
/// element rule, which beats the default rule.
#[derive(Debug)]
pub struct RuleTable<N> {
    modes: HashMap<Mode, ModeRules<N>>,
}

impl<N> Default for RuleTable<N> {
    fn default() -> Self {
        Self {
            modes: HashMap::new(),
        }
    }
}

impl<N: GroveNode> RuleTable<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule, returning the one it replaces.
    pub fn add(&mut self, mode: Mode, pattern: RulePattern, rule: Rule<N>) -> Option<Rule<N>> {
        let rules = self.modes.entry(mode).or_default();
        match pattern {
            RulePattern::Root => rules.root.replace(rule),
            RulePattern::Element(gi) => rules.elements.insert(gi, rule),
            RulePattern::Id(id) => rules.ids.insert(id, rule),
            RulePattern::Default => rules.default.replace(rule),
        }
    }

    pub fn with(mut self, mode: Mode, pattern: RulePattern, rule: Rule<N>) -> Self {
        if self.add(mode, pattern, rule).is_some() {
            log::warn!("Rule replaced an earlier rule for the same pattern");
        }
        self
    }

    /// Shorthand for an element rule in the initial mode.
    pub fn element(self, gi: &str, sosofo: Sosofo<N>) -> Self {
        self.with(
            Mode::initial(),
            RulePattern::Element(gi.into()),
            Rule::sosofo(sosofo),
        )
    }

    pub fn len(&self) -> usize {
        self.modes
            .values()
            .map(|r| {
                r.ids.len()
                    + r.elements.len()
                    + usize::from(r.root.is_some())
                    + usize::from(r.default.is_some())
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<N: GroveNode> RuleMatcher<N> for RuleTable<N> {
    fn find_match(
        &self,
        node: &N,
        mode: &Mode,
        specificity: &mut Specificity,
    ) -> Option<&Rule<N>> {
        let own = self.modes.get(mode).map(|rules| rules.matching(node));
        let inherited = if mode.is_initial() {
            None
        } else {
            self.modes
                .get(&Mode::initial())
                .map(|rules| rules.matching(node))
        };
        let rule = own
            .into_iter()
            .chain(inherited)
            .flatten()
            .flatten()
            .nth(specificity.rank)?;
        specificity.rank += 1;
        Some(rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galley_grove::testing::GroveBuilder;

    fn literal<N>(s: &str) -> Sosofo<N> {
        Sosofo::Literal(s.to_string())
    }

    fn text_of<N>(rule: Option<&Rule<N>>) -> Option<String> {
        match rule.map(|r| &r.action) {
            Some(RuleAction::Sosofo(Sosofo::Literal(s))) => Some(s.clone()),
            _ => None,
        }
    }

    #[test]
    fn empty_name_is_initial_mode() {
        assert!(Mode::named("").is_initial());
        assert_eq!(Mode::named("toc").name(), "toc");
        assert_eq!(Mode::initial(), Mode::default());
    }

    #[test]
    fn candidates_follow_priority_then_run_out() {
        let grove = GroveBuilder::new()
            .element("doc", |b| b.element("p", |b| b.attribute("id", "intro")))
            .finish();
        let p = grove.element_with_id("intro").unwrap();
        let table = RuleTable::new()
            .with(Mode::initial(), RulePattern::Default, Rule::sosofo(literal("default")))
            .with(Mode::initial(), RulePattern::Element("p".into()), Rule::sosofo(literal("p")))
            .with(Mode::initial(), RulePattern::Id("intro".into()), Rule::sosofo(literal("id")));

        let mut spec = Specificity::default();
        let mode = Mode::initial();
        assert_eq!(text_of(table.find_match(&p, &mode, &mut spec)).as_deref(), Some("id"));
        assert_eq!(text_of(table.find_match(&p, &mode, &mut spec)).as_deref(), Some("p"));
        assert_eq!(text_of(table.find_match(&p, &mode, &mut spec)).as_deref(), Some("default"));
        assert!(table.find_match(&p, &mode, &mut spec).is_none());
        assert_eq!(spec.rank, 3);
    }

    #[test]
    fn named_mode_falls_back_to_initial_rules() {
        let grove = GroveBuilder::new().element("doc", |b| b).finish();
        let doc = grove.root().document_element().unwrap();
        let table = RuleTable::new()
            .element("doc", literal("initial"))
            .with(Mode::named("toc"), RulePattern::Element("doc".into()), Rule::sosofo(literal("toc")));

        let mut spec = Specificity::default();
        let toc = Mode::named("toc");
        assert_eq!(text_of(table.find_match(&doc, &toc, &mut spec)).as_deref(), Some("toc"));
        assert_eq!(text_of(table.find_match(&doc, &toc, &mut spec)).as_deref(), Some("initial"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn root_rule_only_matches_root() {
        let grove = GroveBuilder::new().element("doc", |b| b.text("x")).finish();
        let table = RuleTable::new()
            .with(Mode::initial(), RulePattern::Root, Rule::sosofo(literal("root")))
            .with(Mode::initial(), RulePattern::Default, Rule::sosofo(literal("any")));
        let mode = Mode::initial();

        let root_rule = table.find_match(&grove.root(), &mode, &mut Specificity::default());
        assert_eq!(text_of(root_rule).as_deref(), Some("root"));

        let text = grove.root().document_element().unwrap().first_child().unwrap();
        assert!(table.find_match(&text, &mode, &mut Specificity::default()).is_none());
    }
}
