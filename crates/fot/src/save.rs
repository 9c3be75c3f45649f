//! A `FotBuilder` that records calls for later replay.
//!
//! Used wherever output cannot reach its final sink yet: a port that is
//! already being written, principal-port content produced below the level
//! that owns it, and the per-port streams of a multi-port flow object.

use crate::builder::FotBuilder;
use crate::characteristic::Characteristic;
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
use std::fmt;

/// One recorded sink operation.
#[derive(Debug, Clone, PartialEq)]
pub enum FotCommand {
    StartNode(NodeId, String),
    EndNode,
    Characters(String),
    CharactersFromNode(NodeId, String),
    Character(CharacterNic),
    ParagraphBreak(ParagraphNic),
    ExternalGraphic(ExternalGraphicNic),
    Rule(RuleNic),
    AlignmentPoint,
    PageNumber,
    CurrentNodePageNumber(NodeId),
    FormattingInstruction(String),
    Anchor(AnchorNic),
    Extension(ExtensionNic, NodeId),
    StartSequence,
    EndSequence,
    StartDisplayGroup(DisplayNic),
    EndDisplayGroup,
    StartParagraph(ParagraphNic),
    EndParagraph,
    StartLineField(LineFieldNic),
    EndLineField,
    StartBox(BoxNic),
    EndBox,
    StartLeader(LeaderNic),
    EndLeader,
    StartLink(LinkAddress),
    EndLink,
    StartMarginalia,
    EndMarginalia,
    StartSideline,
    EndSideline,
    StartScore(ScoreKind),
    EndScore,
    StartTable(TableNic),
    EndTable,
    TableColumn(TableColumnNic),
    StartTablePartSerial(TablePartNic),
    EndTablePartSerial,
    StartTablePartPort(TablePartPort),
    EndTablePartPort(TablePartPort),
    StartTableRow,
    EndTableRow,
    StartTableCell(TableCellNic),
    EndTableCell,
    StartMathSequence,
    EndMathSequence,
    StartUnmath,
    EndUnmath,
    StartSuperscript,
    EndSuperscript,
    StartSubscript,
    EndSubscript,
    StartFractionSerial,
    EndFractionSerial,
    StartFractionPort(FractionPort),
    EndFractionPort(FractionPort),
    StartScriptSerial,
    EndScriptSerial,
    StartScriptPort(ScriptPort),
    EndScriptPort(ScriptPort),
    StartMarkSerial,
    EndMarkSerial,
    StartMarkPort(MarkPort),
    EndMarkPort(MarkPort),
    StartFenceSerial,
    EndFenceSerial,
    StartFencePort(FencePort),
    EndFencePort(FencePort),
    StartRadicalSerial,
    EndRadicalSerial,
    StartRadicalPort(RadicalPort),
    EndRadicalPort(RadicalPort),
    StartMathOperatorSerial,
    EndMathOperatorSerial,
    StartMathOperatorPort(MathOperatorPort),
    EndMathOperatorPort(MathOperatorPort),
    StartGrid(GridNic),
    EndGrid,
    StartGridCell(GridCellNic),
    EndGridCell,
    StartMultiModeSerial(Option<MultiModeMode>),
    EndMultiModeSerial,
    StartMultiModeMode(MultiModeMode),
    EndMultiModeMode,
    StartSimplePageSequenceSerial,
    EndSimplePageSequenceSerial,
    StartSimplePageSequenceHeaderFooter(HeaderFooterSlot),
    EndSimplePageSequenceHeaderFooter(HeaderFooterSlot),
    EndAllSimplePageSequenceHeaderFooter,
    StartExtensionSerial(ExtensionNic),
    EndExtensionSerial,
    StartExtensionStream(Symbol),
    EndExtensionStream(Symbol),
    Set(Characteristic),
}

impl FotCommand {
    /// Re-issues this command on `target`.
    pub fn apply(self, target: &mut dyn FotBuilder) {
        match self {
            FotCommand::StartNode(node, mode) => target.start_node(node, &mode),
            FotCommand::EndNode => target.end_node(),
            FotCommand::Characters(s) => target.characters(&s),
            FotCommand::CharactersFromNode(node, s) => target.characters_from_node(node, &s),
            FotCommand::Character(nic) => target.character(&nic),
            FotCommand::ParagraphBreak(nic) => target.paragraph_break(&nic),
            FotCommand::ExternalGraphic(nic) => target.external_graphic(&nic),
            FotCommand::Rule(nic) => target.rule(&nic),
            FotCommand::AlignmentPoint => target.alignment_point(),
            FotCommand::PageNumber => target.page_number(),
            FotCommand::CurrentNodePageNumber(node) => target.current_node_page_number(node),
            FotCommand::FormattingInstruction(s) => target.formatting_instruction(&s),
            FotCommand::Anchor(nic) => target.anchor(&nic),
            FotCommand::Extension(nic, node) => target.extension(&nic, node),
            FotCommand::StartSequence => target.start_sequence(),
            FotCommand::EndSequence => target.end_sequence(),
            FotCommand::StartDisplayGroup(nic) => target.start_display_group(&nic),
            FotCommand::EndDisplayGroup => target.end_display_group(),
            FotCommand::StartParagraph(nic) => target.start_paragraph(&nic),
            FotCommand::EndParagraph => target.end_paragraph(),
            FotCommand::StartLineField(nic) => target.start_line_field(&nic),
            FotCommand::EndLineField => target.end_line_field(),
            FotCommand::StartBox(nic) => target.start_box(&nic),
            FotCommand::EndBox => target.end_box(),
            FotCommand::StartLeader(nic) => target.start_leader(&nic),
            FotCommand::EndLeader => target.end_leader(),
            FotCommand::StartLink(address) => target.start_link(&address),
            FotCommand::EndLink => target.end_link(),
            FotCommand::StartMarginalia => target.start_marginalia(),
            FotCommand::EndMarginalia => target.end_marginalia(),
            FotCommand::StartSideline => target.start_sideline(),
            FotCommand::EndSideline => target.end_sideline(),
            FotCommand::StartScore(kind) => target.start_score(&kind),
            FotCommand::EndScore => target.end_score(),
            FotCommand::StartTable(nic) => target.start_table(&nic),
            FotCommand::EndTable => target.end_table(),
            FotCommand::TableColumn(nic) => target.table_column(&nic),
            FotCommand::StartTablePartSerial(nic) => target.start_table_part_serial(&nic),
            FotCommand::EndTablePartSerial => target.end_table_part_serial(),
            FotCommand::StartTablePartPort(p) => target.start_table_part_port(p),
            FotCommand::EndTablePartPort(p) => target.end_table_part_port(p),
            FotCommand::StartTableRow => target.start_table_row(),
            FotCommand::EndTableRow => target.end_table_row(),
            FotCommand::StartTableCell(nic) => target.start_table_cell(&nic),
            FotCommand::EndTableCell => target.end_table_cell(),
            FotCommand::StartMathSequence => target.start_math_sequence(),
            FotCommand::EndMathSequence => target.end_math_sequence(),
            FotCommand::StartUnmath => target.start_unmath(),
            FotCommand::EndUnmath => target.end_unmath(),
            FotCommand::StartSuperscript => target.start_superscript(),
            FotCommand::EndSuperscript => target.end_superscript(),
            FotCommand::StartSubscript => target.start_subscript(),
            FotCommand::EndSubscript => target.end_subscript(),
            FotCommand::StartFractionSerial => target.start_fraction_serial(),
            FotCommand::EndFractionSerial => target.end_fraction_serial(),
            FotCommand::StartFractionPort(p) => target.start_fraction_port(p),
            FotCommand::EndFractionPort(p) => target.end_fraction_port(p),
            FotCommand::StartScriptSerial => target.start_script_serial(),
            FotCommand::EndScriptSerial => target.end_script_serial(),
            FotCommand::StartScriptPort(p) => target.start_script_port(p),
            FotCommand::EndScriptPort(p) => target.end_script_port(p),
            FotCommand::StartMarkSerial => target.start_mark_serial(),
            FotCommand::EndMarkSerial => target.end_mark_serial(),
            FotCommand::StartMarkPort(p) => target.start_mark_port(p),
            FotCommand::EndMarkPort(p) => target.end_mark_port(p),
            FotCommand::StartFenceSerial => target.start_fence_serial(),
            FotCommand::EndFenceSerial => target.end_fence_serial(),
            FotCommand::StartFencePort(p) => target.start_fence_port(p),
            FotCommand::EndFencePort(p) => target.end_fence_port(p),
            FotCommand::StartRadicalSerial => target.start_radical_serial(),
            FotCommand::EndRadicalSerial => target.end_radical_serial(),
            FotCommand::StartRadicalPort(p) => target.start_radical_port(p),
            FotCommand::EndRadicalPort(p) => target.end_radical_port(p),
            FotCommand::StartMathOperatorSerial => target.start_math_operator_serial(),
            FotCommand::EndMathOperatorSerial => target.end_math_operator_serial(),
            FotCommand::StartMathOperatorPort(p) => target.start_math_operator_port(p),
            FotCommand::EndMathOperatorPort(p) => target.end_math_operator_port(p),
            FotCommand::StartGrid(nic) => target.start_grid(&nic),
            FotCommand::EndGrid => target.end_grid(),
            FotCommand::StartGridCell(nic) => target.start_grid_cell(&nic),
            FotCommand::EndGridCell => target.end_grid_cell(),
            FotCommand::StartMultiModeSerial(principal) => {
                target.start_multi_mode_serial(principal.as_ref())
            }
            FotCommand::EndMultiModeSerial => target.end_multi_mode_serial(),
            FotCommand::StartMultiModeMode(mode) => target.start_multi_mode_mode(&mode),
            FotCommand::EndMultiModeMode => target.end_multi_mode_mode(),
            FotCommand::StartSimplePageSequenceSerial => {
                target.start_simple_page_sequence_serial()
            }
            FotCommand::EndSimplePageSequenceSerial => target.end_simple_page_sequence_serial(),
            FotCommand::StartSimplePageSequenceHeaderFooter(slot) => {
                target.start_simple_page_sequence_header_footer(slot)
            }
            FotCommand::EndSimplePageSequenceHeaderFooter(slot) => {
                target.end_simple_page_sequence_header_footer(slot)
            }
            FotCommand::EndAllSimplePageSequenceHeaderFooter => {
                target.end_all_simple_page_sequence_header_footer()
            }
            FotCommand::StartExtensionSerial(nic) => target.start_extension_serial(&nic),
            FotCommand::EndExtensionSerial => target.end_extension_serial(),
            FotCommand::StartExtensionStream(port) => target.start_extension_stream(&port),
            FotCommand::EndExtensionStream(port) => target.end_extension_stream(&port),
            FotCommand::Set(c) => c.apply(target),
        }
    }

    /// The sink method this command re-issues.
    pub fn name(&self) -> &'static str {
        match self {
            FotCommand::StartNode(..) => "start_node",
            FotCommand::EndNode => "end_node",
            FotCommand::Characters(_) => "characters",
            FotCommand::CharactersFromNode(..) => "characters_from_node",
            FotCommand::Character(_) => "character",
            FotCommand::ParagraphBreak(_) => "paragraph_break",
            FotCommand::ExternalGraphic(_) => "external_graphic",
            FotCommand::Rule(_) => "rule",
            FotCommand::AlignmentPoint => "alignment_point",
            FotCommand::PageNumber => "page_number",
            FotCommand::CurrentNodePageNumber(_) => "current_node_page_number",
            FotCommand::FormattingInstruction(_) => "formatting_instruction",
            FotCommand::Anchor(_) => "anchor",
            FotCommand::Extension(..) => "extension",
            FotCommand::StartSequence => "start_sequence",
            FotCommand::EndSequence => "end_sequence",
            FotCommand::StartDisplayGroup(_) => "start_display_group",
            FotCommand::EndDisplayGroup => "end_display_group",
            FotCommand::StartParagraph(_) => "start_paragraph",
            FotCommand::EndParagraph => "end_paragraph",
            FotCommand::StartLineField(_) => "start_line_field",
            FotCommand::EndLineField => "end_line_field",
            FotCommand::StartBox(_) => "start_box",
            FotCommand::EndBox => "end_box",
            FotCommand::StartLeader(_) => "start_leader",
            FotCommand::EndLeader => "end_leader",
            FotCommand::StartLink(_) => "start_link",
            FotCommand::EndLink => "end_link",
            FotCommand::StartMarginalia => "start_marginalia",
            FotCommand::EndMarginalia => "end_marginalia",
            FotCommand::StartSideline => "start_sideline",
            FotCommand::EndSideline => "end_sideline",
            FotCommand::StartScore(_) => "start_score",
            FotCommand::EndScore => "end_score",
            FotCommand::StartTable(_) => "start_table",
            FotCommand::EndTable => "end_table",
            FotCommand::TableColumn(_) => "table_column",
            FotCommand::StartTablePartSerial(_) => "start_table_part_serial",
            FotCommand::EndTablePartSerial => "end_table_part_serial",
            FotCommand::StartTablePartPort(_) => "start_table_part_port",
            FotCommand::EndTablePartPort(_) => "end_table_part_port",
            FotCommand::StartTableRow => "start_table_row",
            FotCommand::EndTableRow => "end_table_row",
            FotCommand::StartTableCell(_) => "start_table_cell",
            FotCommand::EndTableCell => "end_table_cell",
            FotCommand::StartMathSequence => "start_math_sequence",
            FotCommand::EndMathSequence => "end_math_sequence",
            FotCommand::StartUnmath => "start_unmath",
            FotCommand::EndUnmath => "end_unmath",
            FotCommand::StartSuperscript => "start_superscript",
            FotCommand::EndSuperscript => "end_superscript",
            FotCommand::StartSubscript => "start_subscript",
            FotCommand::EndSubscript => "end_subscript",
            FotCommand::StartFractionSerial => "start_fraction_serial",
            FotCommand::EndFractionSerial => "end_fraction_serial",
            FotCommand::StartFractionPort(_) => "start_fraction_port",
            FotCommand::EndFractionPort(_) => "end_fraction_port",
            FotCommand::StartScriptSerial => "start_script_serial",
            FotCommand::EndScriptSerial => "end_script_serial",
            FotCommand::StartScriptPort(_) => "start_script_port",
            FotCommand::EndScriptPort(_) => "end_script_port",
            FotCommand::StartMarkSerial => "start_mark_serial",
            FotCommand::EndMarkSerial => "end_mark_serial",
            FotCommand::StartMarkPort(_) => "start_mark_port",
            FotCommand::EndMarkPort(_) => "end_mark_port",
            FotCommand::StartFenceSerial => "start_fence_serial",
            FotCommand::EndFenceSerial => "end_fence_serial",
            FotCommand::StartFencePort(_) => "start_fence_port",
            FotCommand::EndFencePort(_) => "end_fence_port",
            FotCommand::StartRadicalSerial => "start_radical_serial",
            FotCommand::EndRadicalSerial => "end_radical_serial",
            FotCommand::StartRadicalPort(_) => "start_radical_port",
            FotCommand::EndRadicalPort(_) => "end_radical_port",
            FotCommand::StartMathOperatorSerial => "start_math_operator_serial",
            FotCommand::EndMathOperatorSerial => "end_math_operator_serial",
            FotCommand::StartMathOperatorPort(_) => "start_math_operator_port",
            FotCommand::EndMathOperatorPort(_) => "end_math_operator_port",
            FotCommand::StartGrid(_) => "start_grid",
            FotCommand::EndGrid => "end_grid",
            FotCommand::StartGridCell(_) => "start_grid_cell",
            FotCommand::EndGridCell => "end_grid_cell",
            FotCommand::StartMultiModeSerial(_) => "start_multi_mode_serial",
            FotCommand::EndMultiModeSerial => "end_multi_mode_serial",
            FotCommand::StartMultiModeMode(_) => "start_multi_mode_mode",
            FotCommand::EndMultiModeMode => "end_multi_mode_mode",
            FotCommand::StartSimplePageSequenceSerial => "start_simple_page_sequence_serial",
            FotCommand::EndSimplePageSequenceSerial => "end_simple_page_sequence_serial",
            FotCommand::StartSimplePageSequenceHeaderFooter(_) => {
                "start_simple_page_sequence_header_footer"
            }
            FotCommand::EndSimplePageSequenceHeaderFooter(_) => {
                "end_simple_page_sequence_header_footer"
            }
            FotCommand::EndAllSimplePageSequenceHeaderFooter => {
                "end_all_simple_page_sequence_header_footer"
            }
            FotCommand::StartExtensionSerial(_) => "start_extension_serial",
            FotCommand::EndExtensionSerial => "end_extension_serial",
            FotCommand::StartExtensionStream(_) => "start_extension_stream",
            FotCommand::EndExtensionStream(_) => "end_extension_stream",
            FotCommand::Set(_) => "set",
        }
    }

    /// True for the `start_*` half of a balanced pair (node scopes included).
    pub fn opens_scope(&self) -> bool {
        let name = self.name();
        name.starts_with("start_")
    }

    /// True for the `end_*` half of a balanced pair.
    /// `end_all_simple_page_sequence_header_footer` is a marker, not a closer.
    pub fn closes_scope(&self) -> bool {
        !matches!(self, FotCommand::EndAllSimplePageSequenceHeaderFooter)
            && self.name().starts_with("end_")
    }
}

impl fmt::Display for FotCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name();
        match self {
            FotCommand::StartNode(node, mode) if mode.is_empty() => write!(f, "{name}({node})"),
            FotCommand::StartNode(node, mode) => write!(f, "{name}({node}, {mode})"),
            FotCommand::Characters(s) | FotCommand::FormattingInstruction(s) => {
                write!(f, "{name}({s:?})")
            }
            FotCommand::CharactersFromNode(node, s) => write!(f, "{name}({node}, {s:?})"),
            FotCommand::Character(nic) => write!(f, "{name}({:?})", nic.ch),
            FotCommand::CurrentNodePageNumber(node) => write!(f, "{name}({node})"),
            FotCommand::StartTablePartPort(p) | FotCommand::EndTablePartPort(p) => {
                write!(f, "{name}({})", p.name())
            }
            FotCommand::StartFractionPort(p) | FotCommand::EndFractionPort(p) => {
                write!(f, "{name}({})", p.name())
            }
            FotCommand::StartScriptPort(p) | FotCommand::EndScriptPort(p) => {
                write!(f, "{name}({})", p.name())
            }
            FotCommand::StartMarkPort(p) | FotCommand::EndMarkPort(p) => {
                write!(f, "{name}({})", p.name())
            }
            FotCommand::StartFencePort(p) | FotCommand::EndFencePort(p) => {
                write!(f, "{name}({})", p.name())
            }
            FotCommand::StartRadicalPort(p) | FotCommand::EndRadicalPort(p) => {
                write!(f, "{name}({})", p.name())
            }
            FotCommand::StartMathOperatorPort(p) | FotCommand::EndMathOperatorPort(p) => {
                write!(f, "{name}({})", p.name())
            }
            FotCommand::StartSimplePageSequenceHeaderFooter(slot)
            | FotCommand::EndSimplePageSequenceHeaderFooter(slot) => write!(f, "{name}({slot})"),
            FotCommand::StartMultiModeMode(mode) => write!(f, "{name}({})", mode.name),
            FotCommand::StartExtensionStream(port) | FotCommand::EndExtensionStream(port) => {
                write!(f, "{name}({port})")
            }
            FotCommand::StartTableCell(nic) => write!(
                f,
                "{name}(col {}, span {}x{}{})",
                nic.column_index,
                nic.n_columns_spanned,
                nic.n_rows_spanned,
                if nic.missing { ", missing" } else { "" }
            ),
            FotCommand::Set(c) => write!(f, "{name}({})", c.name()),
            _ => f.write_str(name),
        }
    }
}

/// Records sink operations for replay into another sink.
///
/// A recorder tagged with a node and mode wraps its replay in
/// `start_node`/`end_node` so the receiving sink can still attribute the
/// content to its source node. [`SaveFotBuilder::emit`] consumes the
/// recorder, so recorded content reaches exactly one sink exactly once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveFotBuilder {
    commands: Vec<FotCommand>,
    tag: Option<(NodeId, String)>,
}

impl SaveFotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tagged(node: NodeId, mode: impl Into<String>) -> Self {
        Self {
            commands: Vec::new(),
            tag: Some((node, mode.into())),
        }
    }

    pub fn record(&mut self, command: FotCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[FotCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<FotCommand> {
        self.commands
    }

    pub fn tag(&self) -> Option<(NodeId, &str)> {
        self.tag.as_ref().map(|(node, mode)| (*node, mode.as_str()))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Replays every recorded command into `target`, in recording order.
    pub fn emit(self, target: &mut dyn FotBuilder) {
        log::trace!(
            "Replaying {} recorded commands (tagged: {})",
            self.commands.len(),
            self.tag.is_some()
        );
        if let Some((node, mode)) = &self.tag {
            target.start_node(*node, mode);
        }
        for command in self.commands {
            command.apply(target);
        }
        if self.tag.is_some() {
            target.end_node();
        }
    }
}

impl FotBuilder for SaveFotBuilder {
    fn start_node(&mut self, node: NodeId, mode: &str) {
        self.record(FotCommand::StartNode(node, mode.to_string()));
    }
    fn end_node(&mut self) {
        self.record(FotCommand::EndNode);
    }
    fn characters(&mut self, text: &str) {
        self.record(FotCommand::Characters(text.to_string()));
    }
    fn characters_from_node(&mut self, node: NodeId, text: &str) {
        self.record(FotCommand::CharactersFromNode(node, text.to_string()));
    }
    fn character(&mut self, nic: &CharacterNic) {
        self.record(FotCommand::Character(nic.clone()));
    }
    fn paragraph_break(&mut self, nic: &ParagraphNic) {
        self.record(FotCommand::ParagraphBreak(nic.clone()));
    }
    fn external_graphic(&mut self, nic: &ExternalGraphicNic) {
        self.record(FotCommand::ExternalGraphic(nic.clone()));
    }
    fn rule(&mut self, nic: &RuleNic) {
        self.record(FotCommand::Rule(nic.clone()));
    }
    fn alignment_point(&mut self) {
        self.record(FotCommand::AlignmentPoint);
    }
    fn page_number(&mut self) {
        self.record(FotCommand::PageNumber);
    }
    fn current_node_page_number(&mut self, node: NodeId) {
        self.record(FotCommand::CurrentNodePageNumber(node));
    }
    fn formatting_instruction(&mut self, text: &str) {
        self.record(FotCommand::FormattingInstruction(text.to_string()));
    }
    fn anchor(&mut self, nic: &AnchorNic) {
        self.record(FotCommand::Anchor(nic.clone()));
    }
    fn extension(&mut self, nic: &ExtensionNic, node: NodeId) {
        self.record(FotCommand::Extension(nic.clone(), node));
    }
    fn start_sequence(&mut self) {
        self.record(FotCommand::StartSequence);
    }
    fn end_sequence(&mut self) {
        self.record(FotCommand::EndSequence);
    }
    fn start_display_group(&mut self, nic: &DisplayNic) {
        self.record(FotCommand::StartDisplayGroup(nic.clone()));
    }
    fn end_display_group(&mut self) {
        self.record(FotCommand::EndDisplayGroup);
    }
    fn start_paragraph(&mut self, nic: &ParagraphNic) {
        self.record(FotCommand::StartParagraph(nic.clone()));
    }
    fn end_paragraph(&mut self) {
        self.record(FotCommand::EndParagraph);
    }
    fn start_line_field(&mut self, nic: &LineFieldNic) {
        self.record(FotCommand::StartLineField(nic.clone()));
    }
    fn end_line_field(&mut self) {
        self.record(FotCommand::EndLineField);
    }
    fn start_box(&mut self, nic: &BoxNic) {
        self.record(FotCommand::StartBox(nic.clone()));
    }
    fn end_box(&mut self) {
        self.record(FotCommand::EndBox);
    }
    fn start_leader(&mut self, nic: &LeaderNic) {
        self.record(FotCommand::StartLeader(nic.clone()));
    }
    fn end_leader(&mut self) {
        self.record(FotCommand::EndLeader);
    }
    fn start_link(&mut self, address: &LinkAddress) {
        self.record(FotCommand::StartLink(address.clone()));
    }
    fn end_link(&mut self) {
        self.record(FotCommand::EndLink);
    }
    fn start_marginalia(&mut self) {
        self.record(FotCommand::StartMarginalia);
    }
    fn end_marginalia(&mut self) {
        self.record(FotCommand::EndMarginalia);
    }
    fn start_sideline(&mut self) {
        self.record(FotCommand::StartSideline);
    }
    fn end_sideline(&mut self) {
        self.record(FotCommand::EndSideline);
    }
    fn start_score(&mut self, kind: &ScoreKind) {
        self.record(FotCommand::StartScore(*kind));
    }
    fn end_score(&mut self) {
        self.record(FotCommand::EndScore);
    }
    fn start_table(&mut self, nic: &TableNic) {
        self.record(FotCommand::StartTable(nic.clone()));
    }
    fn end_table(&mut self) {
        self.record(FotCommand::EndTable);
    }
    fn table_column(&mut self, nic: &TableColumnNic) {
        self.record(FotCommand::TableColumn(nic.clone()));
    }
    fn start_table_part_serial(&mut self, nic: &TablePartNic) {
        self.record(FotCommand::StartTablePartSerial(nic.clone()));
    }
    fn end_table_part_serial(&mut self) {
        self.record(FotCommand::EndTablePartSerial);
    }
    fn start_table_part_port(&mut self, port: TablePartPort) {
        self.record(FotCommand::StartTablePartPort(port));
    }
    fn end_table_part_port(&mut self, port: TablePartPort) {
        self.record(FotCommand::EndTablePartPort(port));
    }
    fn start_table_row(&mut self) {
        self.record(FotCommand::StartTableRow);
    }
    fn end_table_row(&mut self) {
        self.record(FotCommand::EndTableRow);
    }
    fn start_table_cell(&mut self, nic: &TableCellNic) {
        self.record(FotCommand::StartTableCell(nic.clone()));
    }
    fn end_table_cell(&mut self) {
        self.record(FotCommand::EndTableCell);
    }
    fn start_math_sequence(&mut self) {
        self.record(FotCommand::StartMathSequence);
    }
    fn end_math_sequence(&mut self) {
        self.record(FotCommand::EndMathSequence);
    }
    fn start_unmath(&mut self) {
        self.record(FotCommand::StartUnmath);
    }
    fn end_unmath(&mut self) {
        self.record(FotCommand::EndUnmath);
    }
    fn start_superscript(&mut self) {
        self.record(FotCommand::StartSuperscript);
    }
    fn end_superscript(&mut self) {
        self.record(FotCommand::EndSuperscript);
    }
    fn start_subscript(&mut self) {
        self.record(FotCommand::StartSubscript);
    }
    fn end_subscript(&mut self) {
        self.record(FotCommand::EndSubscript);
    }
    fn start_fraction_serial(&mut self) {
        self.record(FotCommand::StartFractionSerial);
    }
    fn end_fraction_serial(&mut self) {
        self.record(FotCommand::EndFractionSerial);
    }
    fn start_fraction_port(&mut self, port: FractionPort) {
        self.record(FotCommand::StartFractionPort(port));
    }
    fn end_fraction_port(&mut self, port: FractionPort) {
        self.record(FotCommand::EndFractionPort(port));
    }
    fn start_script_serial(&mut self) {
        self.record(FotCommand::StartScriptSerial);
    }
    fn end_script_serial(&mut self) {
        self.record(FotCommand::EndScriptSerial);
    }
    fn start_script_port(&mut self, port: ScriptPort) {
        self.record(FotCommand::StartScriptPort(port));
    }
    fn end_script_port(&mut self, port: ScriptPort) {
        self.record(FotCommand::EndScriptPort(port));
    }
    fn start_mark_serial(&mut self) {
        self.record(FotCommand::StartMarkSerial);
    }
    fn end_mark_serial(&mut self) {
        self.record(FotCommand::EndMarkSerial);
    }
    fn start_mark_port(&mut self, port: MarkPort) {
        self.record(FotCommand::StartMarkPort(port));
    }
    fn end_mark_port(&mut self, port: MarkPort) {
        self.record(FotCommand::EndMarkPort(port));
    }
    fn start_fence_serial(&mut self) {
        self.record(FotCommand::StartFenceSerial);
    }
    fn end_fence_serial(&mut self) {
        self.record(FotCommand::EndFenceSerial);
    }
    fn start_fence_port(&mut self, port: FencePort) {
        self.record(FotCommand::StartFencePort(port));
    }
    fn end_fence_port(&mut self, port: FencePort) {
        self.record(FotCommand::EndFencePort(port));
    }
    fn start_radical_serial(&mut self) {
        self.record(FotCommand::StartRadicalSerial);
    }
    fn end_radical_serial(&mut self) {
        self.record(FotCommand::EndRadicalSerial);
    }
    fn start_radical_port(&mut self, port: RadicalPort) {
        self.record(FotCommand::StartRadicalPort(port));
    }
    fn end_radical_port(&mut self, port: RadicalPort) {
        self.record(FotCommand::EndRadicalPort(port));
    }
    fn start_math_operator_serial(&mut self) {
        self.record(FotCommand::StartMathOperatorSerial);
    }
    fn end_math_operator_serial(&mut self) {
        self.record(FotCommand::EndMathOperatorSerial);
    }
    fn start_math_operator_port(&mut self, port: MathOperatorPort) {
        self.record(FotCommand::StartMathOperatorPort(port));
    }
    fn end_math_operator_port(&mut self, port: MathOperatorPort) {
        self.record(FotCommand::EndMathOperatorPort(port));
    }
    fn start_grid(&mut self, nic: &GridNic) {
        self.record(FotCommand::StartGrid(*nic));
    }
    fn end_grid(&mut self) {
        self.record(FotCommand::EndGrid);
    }
    fn start_grid_cell(&mut self, nic: &GridCellNic) {
        self.record(FotCommand::StartGridCell(*nic));
    }
    fn end_grid_cell(&mut self) {
        self.record(FotCommand::EndGridCell);
    }
    fn start_multi_mode_serial(&mut self, principal: Option<&MultiModeMode>) {
        self.record(FotCommand::StartMultiModeSerial(principal.cloned()));
    }
    fn end_multi_mode_serial(&mut self) {
        self.record(FotCommand::EndMultiModeSerial);
    }
    fn start_multi_mode_mode(&mut self, mode: &MultiModeMode) {
        self.record(FotCommand::StartMultiModeMode(mode.clone()));
    }
    fn end_multi_mode_mode(&mut self) {
        self.record(FotCommand::EndMultiModeMode);
    }
    fn start_simple_page_sequence_serial(&mut self) {
        self.record(FotCommand::StartSimplePageSequenceSerial);
    }
    fn end_simple_page_sequence_serial(&mut self) {
        self.record(FotCommand::EndSimplePageSequenceSerial);
    }
    fn start_simple_page_sequence_header_footer(&mut self, slot: HeaderFooterSlot) {
        self.record(FotCommand::StartSimplePageSequenceHeaderFooter(slot));
    }
    fn end_simple_page_sequence_header_footer(&mut self, slot: HeaderFooterSlot) {
        self.record(FotCommand::EndSimplePageSequenceHeaderFooter(slot));
    }
    fn end_all_simple_page_sequence_header_footer(&mut self) {
        self.record(FotCommand::EndAllSimplePageSequenceHeaderFooter);
    }
    fn start_extension_serial(&mut self, nic: &ExtensionNic) {
        self.record(FotCommand::StartExtensionSerial(nic.clone()));
    }
    fn end_extension_serial(&mut self) {
        self.record(FotCommand::EndExtensionSerial);
    }
    fn start_extension_stream(&mut self, port: &Symbol) {
        self.record(FotCommand::StartExtensionStream(port.clone()));
    }
    fn end_extension_stream(&mut self, port: &Symbol) {
        self.record(FotCommand::EndExtensionStream(port.clone()));
    }

    fn set_font_size(&mut self, size: f32) {
        self.record(FotCommand::Set(Characteristic::FontSize(size)));
    }
    fn set_font_family_name(&mut self, name: &str) {
        self.record(FotCommand::Set(Characteristic::FontFamilyName(name.to_string())));
    }
    fn set_font_weight(&mut self, weight: FontWeight) {
        self.record(FotCommand::Set(Characteristic::FontWeight(weight)));
    }
    fn set_font_posture(&mut self, posture: FontPosture) {
        self.record(FotCommand::Set(Characteristic::FontPosture(posture)));
    }
    fn set_color(&mut self, color: Color) {
        self.record(FotCommand::Set(Characteristic::Color(color)));
    }
    fn set_background_color(&mut self, color: Option<Color>) {
        self.record(FotCommand::Set(Characteristic::BackgroundColor(color)));
    }
    fn set_start_indent(&mut self, indent: LengthSpec) {
        self.record(FotCommand::Set(Characteristic::StartIndent(indent)));
    }
    fn set_end_indent(&mut self, indent: LengthSpec) {
        self.record(FotCommand::Set(Characteristic::EndIndent(indent)));
    }
    fn set_first_line_start_indent(&mut self, indent: LengthSpec) {
        self.record(FotCommand::Set(Characteristic::FirstLineStartIndent(indent)));
    }
    fn set_line_spacing(&mut self, spacing: LengthSpec) {
        self.record(FotCommand::Set(Characteristic::LineSpacing(spacing)));
    }
    fn set_quadding(&mut self, quadding: Quadding) {
        self.record(FotCommand::Set(Characteristic::Quadding(quadding)));
    }
    fn set_display_alignment(&mut self, alignment: DisplayAlignment) {
        self.record(FotCommand::Set(Characteristic::DisplayAlignment(alignment)));
    }
    fn set_lines(&mut self, lines: Lines) {
        self.record(FotCommand::Set(Characteristic::Lines(lines)));
    }
    fn set_hyphenate(&mut self, hyphenate: bool) {
        self.record(FotCommand::Set(Characteristic::Hyphenate(hyphenate)));
    }
    fn set_language(&mut self, language: Option<&str>) {
        self.record(FotCommand::Set(Characteristic::Language(
            language.map(str::to_string),
        )));
    }
    fn set_country(&mut self, country: Option<&str>) {
        self.record(FotCommand::Set(Characteristic::Country(
            country.map(str::to_string),
        )));
    }
    fn set_position_point_shift(&mut self, shift: LengthSpec) {
        self.record(FotCommand::Set(Characteristic::PositionPointShift(shift)));
    }
    fn set_line_thickness(&mut self, thickness: f32) {
        self.record(FotCommand::Set(Characteristic::LineThickness(thickness)));
    }
    fn set_page_width(&mut self, width: f32) {
        self.record(FotCommand::Set(Characteristic::PageWidth(width)));
    }
    fn set_page_height(&mut self, height: f32) {
        self.record(FotCommand::Set(Characteristic::PageHeight(height)));
    }
    fn set_left_margin(&mut self, margin: f32) {
        self.record(FotCommand::Set(Characteristic::LeftMargin(margin)));
    }
    fn set_right_margin(&mut self, margin: f32) {
        self.record(FotCommand::Set(Characteristic::RightMargin(margin)));
    }
    fn set_top_margin(&mut self, margin: f32) {
        self.record(FotCommand::Set(Characteristic::TopMargin(margin)));
    }
    fn set_bottom_margin(&mut self, margin: f32) {
        self.record(FotCommand::Set(Characteristic::BottomMargin(margin)));
    }
    fn set_header_margin(&mut self, margin: f32) {
        self.record(FotCommand::Set(Characteristic::HeaderMargin(margin)));
    }
    fn set_footer_margin(&mut self, margin: f32) {
        self.record(FotCommand::Set(Characteristic::FooterMargin(margin)));
    }
}
