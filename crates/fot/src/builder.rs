//! Defines the `FotBuilder` trait, which decouples the processor from any
//! concrete formatting backend.

use crate::nic::{
    AnchorNic, BoxNic, CharacterNic, DisplayNic, ExtensionNic, ExternalGraphicNic, GridCellNic,
    GridNic, LeaderNic, LineFieldNic, LinkAddress, MultiModeMode, ParagraphNic, RuleNic,
    ScoreKind, TableCellNic, TableColumnNic, TableNic, TablePartNic,
};
use crate::ports::{
    FencePort, FractionPort, HeaderFooterSlot, MarkPort, MathOperatorPort, RadicalPort,
    ScriptPort, TablePartPort,
};
use galley_types::{
    Color, DisplayAlignment, FontPosture, FontWeight, LengthSpec, Lines, NodeId, Quadding, Symbol,
};

/// The semantic actions of building a flow-object tree.
///
/// Every operation defaults to a no-op, so a backend overrides only what it
/// renders. Callers guarantee that:
///
/// - every `start_*` is matched by exactly one `end_*` before the enclosing
///   scope ends, and pairs nest properly;
/// - `set_*` operations are only issued inside an open scope; they apply to
///   the flow object started next.
///
/// Multi-port flow objects use a serial protocol: `start_*_serial`, then the
/// principal-port content, then each non-empty or empty port in slot order
/// bracketed by `start_*_port`/`end_*_port`, then `end_*_serial`.
pub trait FotBuilder {
    // --- Node scopes ---
    fn start_node(&mut self, _node: NodeId, _mode: &str) {}
    fn end_node(&mut self) {}

    // --- Character data ---
    fn characters(&mut self, _text: &str) {}
    fn characters_from_node(&mut self, _node: NodeId, text: &str) {
        self.characters(text);
    }
    fn character(&mut self, nic: &CharacterNic) {
        let mut buf = [0u8; 4];
        self.characters(nic.ch.encode_utf8(&mut buf));
    }

    // --- Atomic flow objects ---
    fn paragraph_break(&mut self, _nic: &ParagraphNic) {}
    fn external_graphic(&mut self, _nic: &ExternalGraphicNic) {}
    fn rule(&mut self, _nic: &RuleNic) {}
    fn alignment_point(&mut self) {}
    fn page_number(&mut self) {}
    fn current_node_page_number(&mut self, _node: NodeId) {}
    fn formatting_instruction(&mut self, _text: &str) {}
    fn anchor(&mut self, _nic: &AnchorNic) {}
    fn extension(&mut self, _nic: &ExtensionNic, _node: NodeId) {}

    // --- Compound flow objects ---
    fn start_sequence(&mut self) {}
    fn end_sequence(&mut self) {}
    fn atomic_sequence(&mut self) {
        self.start_sequence();
        self.end_sequence();
    }

    fn start_display_group(&mut self, _nic: &DisplayNic) {}
    fn end_display_group(&mut self) {}
    fn atomic_display_group(&mut self, nic: &DisplayNic) {
        self.start_display_group(nic);
        self.end_display_group();
    }

    fn start_paragraph(&mut self, _nic: &ParagraphNic) {}
    fn end_paragraph(&mut self) {}
    fn atomic_paragraph(&mut self, nic: &ParagraphNic) {
        self.start_paragraph(nic);
        self.end_paragraph();
    }

    fn start_line_field(&mut self, _nic: &LineFieldNic) {}
    fn end_line_field(&mut self) {}

    fn start_box(&mut self, _nic: &BoxNic) {}
    fn end_box(&mut self) {}

    fn start_leader(&mut self, _nic: &LeaderNic) {}
    fn end_leader(&mut self) {}

    fn start_link(&mut self, _address: &LinkAddress) {}
    fn end_link(&mut self) {}

    fn start_marginalia(&mut self) {}
    fn end_marginalia(&mut self) {}

    fn start_sideline(&mut self) {}
    fn end_sideline(&mut self) {}

    fn start_score(&mut self, _kind: &ScoreKind) {}
    fn end_score(&mut self) {}

    // --- Tables ---
    fn start_table(&mut self, _nic: &TableNic) {}
    fn end_table(&mut self) {}
    fn table_column(&mut self, _nic: &TableColumnNic) {}

    fn start_table_part_serial(&mut self, _nic: &TablePartNic) {}
    fn end_table_part_serial(&mut self) {}
    fn start_table_part_port(&mut self, _port: TablePartPort) {}
    fn end_table_part_port(&mut self, _port: TablePartPort) {}

    fn start_table_row(&mut self) {}
    fn end_table_row(&mut self) {}

    fn start_table_cell(&mut self, _nic: &TableCellNic) {}
    fn end_table_cell(&mut self) {}
    fn atomic_table_cell(&mut self, nic: &TableCellNic) {
        self.start_table_cell(nic);
        self.end_table_cell();
    }

    // --- Mathematics ---
    fn start_math_sequence(&mut self) {}
    fn end_math_sequence(&mut self) {}

    fn start_unmath(&mut self) {}
    fn end_unmath(&mut self) {}

    fn start_superscript(&mut self) {}
    fn end_superscript(&mut self) {}

    fn start_subscript(&mut self) {}
    fn end_subscript(&mut self) {}

    fn start_fraction_serial(&mut self) {}
    fn end_fraction_serial(&mut self) {}
    fn start_fraction_port(&mut self, _port: FractionPort) {}
    fn end_fraction_port(&mut self, _port: FractionPort) {}

    fn start_script_serial(&mut self) {}
    fn end_script_serial(&mut self) {}
    fn start_script_port(&mut self, _port: ScriptPort) {}
    fn end_script_port(&mut self, _port: ScriptPort) {}

    fn start_mark_serial(&mut self) {}
    fn end_mark_serial(&mut self) {}
    fn start_mark_port(&mut self, _port: MarkPort) {}
    fn end_mark_port(&mut self, _port: MarkPort) {}

    fn start_fence_serial(&mut self) {}
    fn end_fence_serial(&mut self) {}
    fn start_fence_port(&mut self, _port: FencePort) {}
    fn end_fence_port(&mut self, _port: FencePort) {}

    fn start_radical_serial(&mut self) {}
    fn end_radical_serial(&mut self) {}
    fn start_radical_port(&mut self, _port: RadicalPort) {}
    fn end_radical_port(&mut self, _port: RadicalPort) {}

    fn start_math_operator_serial(&mut self) {}
    fn end_math_operator_serial(&mut self) {}
    fn start_math_operator_port(&mut self, _port: MathOperatorPort) {}
    fn end_math_operator_port(&mut self, _port: MathOperatorPort) {}

    fn start_grid(&mut self, _nic: &GridNic) {}
    fn end_grid(&mut self) {}

    fn start_grid_cell(&mut self, _nic: &GridCellNic) {}
    fn end_grid_cell(&mut self) {}

    // --- Multi-mode ---
    fn start_multi_mode_serial(&mut self, _principal: Option<&MultiModeMode>) {}
    fn end_multi_mode_serial(&mut self) {}
    fn start_multi_mode_mode(&mut self, _mode: &MultiModeMode) {}
    fn end_multi_mode_mode(&mut self) {}

    // --- Simple page sequence ---
    fn start_simple_page_sequence_serial(&mut self) {}
    fn end_simple_page_sequence_serial(&mut self) {}
    fn start_simple_page_sequence_header_footer(&mut self, _slot: HeaderFooterSlot) {}
    fn end_simple_page_sequence_header_footer(&mut self, _slot: HeaderFooterSlot) {}
    /// Issued once after all 24 header/footer slots, before the body.
    fn end_all_simple_page_sequence_header_footer(&mut self) {}

    // --- Extension flow objects with ports ---
    fn start_extension_serial(&mut self, _nic: &ExtensionNic) {}
    fn end_extension_serial(&mut self) {}
    fn start_extension_stream(&mut self, _port: &Symbol) {}
    fn end_extension_stream(&mut self, _port: &Symbol) {}

    // --- Inherited characteristics ---
    fn set_font_size(&mut self, _size: f32) {}
    fn set_font_family_name(&mut self, _name: &str) {}
    fn set_font_weight(&mut self, _weight: FontWeight) {}
    fn set_font_posture(&mut self, _posture: FontPosture) {}
    fn set_color(&mut self, _color: Color) {}
    fn set_background_color(&mut self, _color: Option<Color>) {}
    fn set_start_indent(&mut self, _indent: LengthSpec) {}
    fn set_end_indent(&mut self, _indent: LengthSpec) {}
    fn set_first_line_start_indent(&mut self, _indent: LengthSpec) {}
    fn set_line_spacing(&mut self, _spacing: LengthSpec) {}
    fn set_quadding(&mut self, _quadding: Quadding) {}
    fn set_display_alignment(&mut self, _alignment: DisplayAlignment) {}
    fn set_lines(&mut self, _lines: Lines) {}
    fn set_hyphenate(&mut self, _hyphenate: bool) {}
    fn set_language(&mut self, _language: Option<&str>) {}
    fn set_country(&mut self, _country: Option<&str>) {}
    fn set_position_point_shift(&mut self, _shift: LengthSpec) {}
    fn set_line_thickness(&mut self, _thickness: f32) {}
    fn set_page_width(&mut self, _width: f32) {}
    fn set_page_height(&mut self, _height: f32) {}
    fn set_left_margin(&mut self, _margin: f32) {}
    fn set_right_margin(&mut self, _margin: f32) {}
    fn set_top_margin(&mut self, _margin: f32) {}
    fn set_bottom_margin(&mut self, _margin: f32) {}
    fn set_header_margin(&mut self, _margin: f32) {}
    fn set_footer_margin(&mut self, _margin: f32) {}
}

/// A sink that drops everything; the destination of discarded labels.
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreFotBuilder;

impl FotBuilder for IgnoreFotBuilder {}
