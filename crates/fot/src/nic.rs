//! Non-inherited characteristics: per-flow-object values handed to the
//! matching `start_*` call rather than set through the inherited setters.

use galley_types::{LengthSpec, NodeId, Quadding, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BreakKind {
    #[default]
    None,
    Page,
    Column,
    BodyRegion,
    ColumnSet,
}

/// Spacing and keep/break behaviour shared by all display flow objects.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DisplayNic {
    pub space_before: LengthSpec,
    pub space_after: LengthSpec,
    pub keep_with_previous: bool,
    pub keep_with_next: bool,
    pub break_before: BreakKind,
    pub break_after: BreakKind,
}

pub type ParagraphNic = DisplayNic;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CharacterNic {
    pub ch: char,
    pub is_space: bool,
    pub is_record_end: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExternalGraphicNic {
    pub display: Option<DisplayNic>,
    pub entity_system_id: String,
    pub notation_system_id: String,
    pub max_width: Option<LengthSpec>,
    pub max_height: Option<LengthSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RuleOrientation {
    #[default]
    Horizontal,
    Vertical,
    Escapement,
    LineProgression,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RuleNic {
    pub orientation: RuleOrientation,
    pub length: Option<LengthSpec>,
    pub display: Option<DisplayNic>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LeaderNic {
    pub length: Option<LengthSpec>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineFieldNic {
    pub field_width: Option<LengthSpec>,
    pub field_align: Quadding,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoxNic {
    pub display: Option<DisplayNic>,
    pub has_border: bool,
}

/// Destination of a `link` flow object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum LinkAddress {
    #[default]
    None,
    Node(NodeId),
    Entity(String),
    Resource(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AnchorNic {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ScoreKind {
    #[default]
    Through,
    Before,
    After,
    Char(char),
    Length(LengthSpec),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableNic {
    pub display: DisplayNic,
    pub width: Option<LengthSpec>,
    pub collapse_borders: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TablePartNic {
    pub display: DisplayNic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableColumnNic {
    pub column_index: usize,
    pub n_columns_spanned: usize,
    pub width: Option<LengthSpec>,
}

impl Default for TableColumnNic {
    fn default() -> Self {
        Self {
            column_index: 0,
            n_columns_spanned: 1,
            width: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableCellNic {
    pub column_index: usize,
    pub n_columns_spanned: usize,
    pub n_rows_spanned: usize,
    /// Set on cells synthesized to fill a row, not authored.
    pub missing: bool,
}

impl Default for TableCellNic {
    fn default() -> Self {
        Self {
            column_index: 0,
            n_columns_spanned: 1,
            n_rows_spanned: 1,
            missing: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridNic {
    pub n_columns: usize,
    pub n_rows: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridCellNic {
    pub column_number: usize,
    pub row_number: usize,
}

/// One named mode of a `multi-mode` flow object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MultiModeMode {
    pub name: Symbol,
    pub description: String,
}

/// Identifies an extension flow object and the ports it exposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtensionNic {
    pub public_id: Symbol,
    pub port_names: Vec<Symbol>,
}
