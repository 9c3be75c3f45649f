//! Specifications of sequences of flow objects (sosofos).
//!
//! A [`Sosofo`] is the value a construction rule produces: a description of
//! what to emit, evaluated against the processing context when the driver
//! reaches it. Flow objects are one kind of sosofo; the others splice
//! content, recurse into the grove or redirect output through labels.

use crate::error::EvalError;
use crate::rule::Mode;
use galley_fot::{
    AnchorNic, BoxNic, CharacterNic, DisplayNic, ExtensionNic, ExternalGraphicNic, GridCellNic,
    GridNic, HeaderFooterPart, LeaderNic, LineFieldNic, LinkAddress, MultiModeMode, PageType,
    ParagraphNic, RuleNic, ScoreKind, TableNic, TablePartNic,
};
use galley_style::Style;
use galley_types::{LengthSpec, Symbol};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum Sosofo<N> {
    Empty,
    Append(Vec<Sosofo<N>>),
    Literal(String),
    /// Processes the current node's children; `None` keeps the current mode.
    ProcessChildren { mode: Option<Mode> },
    /// Like `ProcessChildren`, with leading and trailing whitespace removed
    /// from the edge text chunks and blank edge chunks skipped.
    ProcessChildrenTrim { mode: Option<Mode> },
    ProcessNode { node: N, mode: Option<Mode> },
    ProcessNodeList { nodes: Vec<N>, mode: Option<Mode> },
    /// Applies the next less specific rule, optionally with an extra style.
    NextMatch { style: Option<Arc<Style>> },
    /// Sends the content to the port or principal port carrying `label`.
    Label { label: Symbol, content: Box<Sosofo<N>> },
    /// Drops whatever the content sends to `label`.
    DiscardLabeled { label: Symbol, content: Box<Sosofo<N>> },
    /// Chooses content by the page type of the header or footer being
    /// generated. Outside a header or footer it produces nothing.
    PageTypeTest {
        test: PageTest,
        if_true: Box<Sosofo<N>>,
        if_false: Box<Sosofo<N>>,
    },
    PageNumber,
    CurrentNodePageNumber,
    /// Content computed when the driver reaches it.
    Deferred(Arc<dyn SosofoExpr<N>>),
    FlowObject(Box<FlowObject<N>>),
}

impl<N> Sosofo<N> {
    pub fn literal(text: impl Into<String>) -> Self {
        Sosofo::Literal(text.into())
    }

    pub fn append(items: impl IntoIterator<Item = Sosofo<N>>) -> Self {
        Sosofo::Append(items.into_iter().collect())
    }

    pub fn process_children() -> Self {
        Sosofo::ProcessChildren { mode: None }
    }

    pub fn process_children_in(mode: Mode) -> Self {
        Sosofo::ProcessChildren { mode: Some(mode) }
    }

    pub fn label(label: impl Into<Symbol>, content: Sosofo<N>) -> Self {
        Sosofo::Label {
            label: label.into(),
            content: Box::new(content),
        }
    }

    pub fn discard_labeled(label: impl Into<Symbol>, content: Sosofo<N>) -> Self {
        Sosofo::DiscardLabeled {
            label: label.into(),
            content: Box::new(content),
        }
    }

    pub fn deferred<F>(f: F) -> Self
    where
        F: Fn(&EvalContext<'_, N>) -> Result<EvalValue<N>, EvalError> + 'static,
    {
        Sosofo::Deferred(Arc::new(FnExpr(f)))
    }
}

impl<N> From<FlowObject<N>> for Sosofo<N> {
    fn from(fo: FlowObject<N>) -> Self {
        Sosofo::FlowObject(Box::new(fo))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTest {
    FirstPage,
    FrontPage,
}

impl PageTest {
    pub fn matches(self, page_type: PageType) -> bool {
        match self {
            PageTest::FirstPage => page_type.first,
            PageTest::FrontPage => page_type.front,
        }
    }
}

/// What a deferred expression sees when it is evaluated.
#[derive(Debug)]
pub struct EvalContext<'c, N> {
    pub node: &'c N,
    pub mode: &'c Mode,
    pub page_type: Option<PageType>,
}

#[derive(Debug, Clone)]
pub enum EvalValue<N> {
    Sosofo(Sosofo<N>),
    /// Any non-sosofo result, described for diagnostics.
    Other(String),
}

/// An expression that yields content when the driver reaches it.
pub trait SosofoExpr<N>: fmt::Debug {
    fn eval(&self, cx: &EvalContext<'_, N>) -> Result<EvalValue<N>, EvalError>;
}

/// Adapts a closure to [`SosofoExpr`].
pub struct FnExpr<F>(pub F);

impl<F> fmt::Debug for FnExpr<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnExpr(..)")
    }
}

impl<N, F> SosofoExpr<N> for FnExpr<F>
where
    F: Fn(&EvalContext<'_, N>) -> Result<EvalValue<N>, EvalError>,
{
    fn eval(&self, cx: &EvalContext<'_, N>) -> Result<EvalValue<N>, EvalError> {
        (self.0)(cx)
    }
}

/// Relabels the ports of a flow object: `(label, Some(port))` routes the
/// label to a port, `(label, None)` makes it a principal-port label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentMap {
    pub entries: Vec<(Symbol, Option<Symbol>)>,
}

impl ContentMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn port(mut self, label: impl Into<Symbol>, port: impl Into<Symbol>) -> Self {
        self.entries.push((label.into(), Some(port.into())));
        self
    }

    pub fn principal(mut self, label: impl Into<Symbol>) -> Self {
        self.entries.push((label.into(), None));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableColumnSpec {
    /// Zero-based; `None` places the column after the previous one.
    pub column_index: Option<usize>,
    pub n_columns_spanned: usize,
    pub width: Option<LengthSpec>,
}

impl Default for TableColumnSpec {
    fn default() -> Self {
        Self {
            column_index: None,
            n_columns_spanned: 1,
            width: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCellSpec {
    /// Zero-based; `None` takes the next column not covered by a row span.
    pub column_index: Option<usize>,
    pub n_columns_spanned: usize,
    pub n_rows_spanned: usize,
    pub starts_row: bool,
    pub ends_row: bool,
}

impl Default for TableCellSpec {
    fn default() -> Self {
        Self {
            column_index: None,
            n_columns_spanned: 1,
            n_rows_spanned: 1,
            starts_row: false,
            ends_row: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HeaderFooterContent<N> {
    pub part: HeaderFooterPart,
    pub content: Sosofo<N>,
}

#[derive(Debug, Clone)]
pub enum FlowObjectKind<N> {
    Sequence,
    DisplayGroup(DisplayNic),
    Paragraph(ParagraphNic),
    ParagraphBreak(ParagraphNic),
    LineField(LineFieldNic),
    Box(BoxNic),
    Rule(RuleNic),
    ExternalGraphic(ExternalGraphicNic),
    Character(CharacterNic),
    Leader(LeaderNic),
    Link(LinkAddress),
    Marginalia,
    Sideline,
    Score(ScoreKind),
    Anchor(AnchorNic),
    AlignmentPoint,
    PageNumber,
    Table(TableNic),
    TablePart(TablePartNic),
    TableColumn(TableColumnSpec),
    TableRow,
    TableCell(TableCellSpec),
    MathSequence,
    Unmath,
    Superscript,
    Subscript,
    Fraction,
    Script,
    Mark,
    Fence,
    Radical,
    MathOperator,
    Grid(GridNic),
    GridCell(GridCellNic),
    MultiMode {
        principal: Option<MultiModeMode>,
        modes: Vec<MultiModeMode>,
    },
    SimplePageSequence {
        headers_footers: Vec<HeaderFooterContent<N>>,
    },
    FormattingInstruction(String),
    Extension(ExtensionNic),
    CompoundExtension(ExtensionNic),
}

impl<N> FlowObjectKind<N> {
    pub fn name(&self) -> &'static str {
        match self {
            FlowObjectKind::Sequence => "sequence",
            FlowObjectKind::DisplayGroup(_) => "display-group",
            FlowObjectKind::Paragraph(_) => "paragraph",
            FlowObjectKind::ParagraphBreak(_) => "paragraph-break",
            FlowObjectKind::LineField(_) => "line-field",
            FlowObjectKind::Box(_) => "box",
            FlowObjectKind::Rule(_) => "rule",
            FlowObjectKind::ExternalGraphic(_) => "external-graphic",
            FlowObjectKind::Character(_) => "character",
            FlowObjectKind::Leader(_) => "leader",
            FlowObjectKind::Link(_) => "link",
            FlowObjectKind::Marginalia => "marginalia",
            FlowObjectKind::Sideline => "sideline",
            FlowObjectKind::Score(_) => "score",
            FlowObjectKind::Anchor(_) => "anchor",
            FlowObjectKind::AlignmentPoint => "alignment-point",
            FlowObjectKind::PageNumber => "page-number",
            FlowObjectKind::Table(_) => "table",
            FlowObjectKind::TablePart(_) => "table-part",
            FlowObjectKind::TableColumn(_) => "table-column",
            FlowObjectKind::TableRow => "table-row",
            FlowObjectKind::TableCell(_) => "table-cell",
            FlowObjectKind::MathSequence => "math-sequence",
            FlowObjectKind::Unmath => "unmath",
            FlowObjectKind::Superscript => "superscript",
            FlowObjectKind::Subscript => "subscript",
            FlowObjectKind::Fraction => "fraction",
            FlowObjectKind::Script => "script",
            FlowObjectKind::Mark => "mark",
            FlowObjectKind::Fence => "fence",
            FlowObjectKind::Radical => "radical",
            FlowObjectKind::MathOperator => "math-operator",
            FlowObjectKind::Grid(_) => "grid",
            FlowObjectKind::GridCell(_) => "grid-cell",
            FlowObjectKind::MultiMode { .. } => "multi-mode",
            FlowObjectKind::SimplePageSequence { .. } => "simple-page-sequence",
            FlowObjectKind::FormattingInstruction(_) => "formatting-instruction",
            FlowObjectKind::Extension(_) | FlowObjectKind::CompoundExtension(_) => "extension",
        }
    }

    /// Rows and columns hand their style to the cells they govern instead
    /// of applying it themselves.
    pub fn applies_own_style(&self) -> bool {
        !matches!(self, FlowObjectKind::TableRow | FlowObjectKind::TableColumn(_))
    }
}

/// A flow object with its style, content and optional port relabelling.
#[derive(Debug, Clone)]
pub struct FlowObject<N> {
    pub kind: FlowObjectKind<N>,
    pub style: Option<Arc<Style>>,
    /// `None` processes the current node's children.
    pub content: Option<Box<Sosofo<N>>>,
    pub content_map: Option<ContentMap>,
}

impl<N> FlowObject<N> {
    pub fn new(kind: FlowObjectKind<N>) -> Self {
        Self {
            kind,
            style: None,
            content: None,
            content_map: None,
        }
    }

    pub fn with_style(mut self, style: Arc<Style>) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_content(mut self, content: Sosofo<N>) -> Self {
        self.content = Some(Box::new(content));
        self
    }

    pub fn with_content_map(mut self, map: ContentMap) -> Self {
        self.content_map = Some(map);
        self
    }

    pub fn into_sosofo(self) -> Sosofo<N> {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_tests_read_page_type_bits() {
        let first_front = PageType::from_bits(3);
        assert!(PageTest::FirstPage.matches(first_front));
        assert!(PageTest::FrontPage.matches(first_front));
        assert!(!PageTest::FirstPage.matches(PageType::from_bits(2)));
    }

    #[test]
    fn content_map_keeps_entry_order() {
        let map = ContentMap::new().port("num", "numerator").principal("body");
        assert_eq!(
            map.entries,
            vec![
                (Symbol::from("num"), Some(Symbol::from("numerator"))),
                (Symbol::from("body"), None),
            ]
        );
    }

    #[test]
    fn rows_and_columns_defer_their_style() {
        assert!(!FlowObjectKind::<()>::TableRow.applies_own_style());
        assert!(!FlowObjectKind::<()>::TableColumn(TableColumnSpec::default()).applies_own_style());
        assert!(FlowObjectKind::<()>::TableCell(TableCellSpec::default()).applies_own_style());
        assert_eq!(FlowObjectKind::<()>::Fraction.name(), "fraction");
    }
}
