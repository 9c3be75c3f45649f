//! Flow-object processing.
//!
//! Entering a flow object raises the flow-object level, applies the flow
//! object's style and then emits it. Flow objects with ports are emitted
//! through the sink's serial protocol: the principal content goes out live
//! and each port's content is recorded, then replayed between
//! `start_*_port`/`end_*_port` once the content is complete.

use crate::connection::TargetId;
use crate::context::ProcessContext;
use crate::diagnostic::DiagnosticKind;
use crate::sosofo::{FlowObject, FlowObjectKind, HeaderFooterContent, Sosofo};
use galley_fot::{
    ExtensionNic, FencePort, FotBuilder, FractionPort, HeaderFooterSlot, MarkPort,
    MathOperatorPort, MultiModeMode, RadicalPort, SaveFotBuilder, ScriptPort, TableColumnNic,
    TablePartNic, TablePartPort,
};
use galley_grove::GroveNode;
use galley_types::Symbol;

/// A flow object emitted through a serial port protocol.
enum Serial<'f> {
    TablePart(&'f TablePartNic),
    Fraction,
    Script,
    Mark,
    Fence,
    Radical,
    MathOperator,
    MultiMode {
        principal: Option<&'f MultiModeMode>,
        modes: &'f [MultiModeMode],
    },
    Extension(&'f ExtensionNic),
}

fn names(ports: impl IntoIterator<Item = &'static str>) -> Vec<Symbol> {
    ports.into_iter().map(Symbol::from).collect()
}

impl Serial<'_> {
    fn port_names(&self) -> Vec<Symbol> {
        match self {
            Serial::TablePart(_) => names(TablePartPort::ALL.map(TablePartPort::name)),
            Serial::Fraction => names(FractionPort::ALL.map(FractionPort::name)),
            Serial::Script => names(ScriptPort::ALL.map(ScriptPort::name)),
            Serial::Mark => names(MarkPort::ALL.map(MarkPort::name)),
            Serial::Fence => names(FencePort::ALL.map(FencePort::name)),
            Serial::Radical => names(RadicalPort::ALL.map(RadicalPort::name)),
            Serial::MathOperator => names(MathOperatorPort::ALL.map(MathOperatorPort::name)),
            Serial::MultiMode { modes, .. } => modes.iter().map(|m| m.name.clone()).collect(),
            Serial::Extension(nic) => nic.port_names.clone(),
        }
    }

    fn start(&self, sink: &mut dyn FotBuilder) {
        match self {
            Serial::TablePart(nic) => sink.start_table_part_serial(nic),
            Serial::Fraction => sink.start_fraction_serial(),
            Serial::Script => sink.start_script_serial(),
            Serial::Mark => sink.start_mark_serial(),
            Serial::Fence => sink.start_fence_serial(),
            Serial::Radical => sink.start_radical_serial(),
            Serial::MathOperator => sink.start_math_operator_serial(),
            Serial::MultiMode { principal, .. } => sink.start_multi_mode_serial(*principal),
            Serial::Extension(nic) => sink.start_extension_serial(nic),
        }
    }

    fn start_port(&self, i: usize, sink: &mut dyn FotBuilder) {
        match self {
            Serial::TablePart(_) => sink.start_table_part_port(TablePartPort::ALL[i]),
            Serial::Fraction => sink.start_fraction_port(FractionPort::ALL[i]),
            Serial::Script => sink.start_script_port(ScriptPort::ALL[i]),
            Serial::Mark => sink.start_mark_port(MarkPort::ALL[i]),
            Serial::Fence => sink.start_fence_port(FencePort::ALL[i]),
            Serial::Radical => sink.start_radical_port(RadicalPort::ALL[i]),
            Serial::MathOperator => sink.start_math_operator_port(MathOperatorPort::ALL[i]),
            Serial::MultiMode { modes, .. } => sink.start_multi_mode_mode(&modes[i]),
            Serial::Extension(nic) => sink.start_extension_stream(&nic.port_names[i]),
        }
    }

    fn end_port(&self, i: usize, sink: &mut dyn FotBuilder) {
        match self {
            Serial::TablePart(_) => sink.end_table_part_port(TablePartPort::ALL[i]),
            Serial::Fraction => sink.end_fraction_port(FractionPort::ALL[i]),
            Serial::Script => sink.end_script_port(ScriptPort::ALL[i]),
            Serial::Mark => sink.end_mark_port(MarkPort::ALL[i]),
            Serial::Fence => sink.end_fence_port(FencePort::ALL[i]),
            Serial::Radical => sink.end_radical_port(RadicalPort::ALL[i]),
            Serial::MathOperator => sink.end_math_operator_port(MathOperatorPort::ALL[i]),
            Serial::MultiMode { .. } => sink.end_multi_mode_mode(),
            Serial::Extension(nic) => sink.end_extension_stream(&nic.port_names[i]),
        }
    }

    fn end(&self, sink: &mut dyn FotBuilder) {
        match self {
            Serial::TablePart(_) => sink.end_table_part_serial(),
            Serial::Fraction => sink.end_fraction_serial(),
            Serial::Script => sink.end_script_serial(),
            Serial::Mark => sink.end_mark_serial(),
            Serial::Fence => sink.end_fence_serial(),
            Serial::Radical => sink.end_radical_serial(),
            Serial::MathOperator => sink.end_math_operator_serial(),
            Serial::MultiMode { .. } => sink.end_multi_mode_serial(),
            Serial::Extension(_) => sink.end_extension_serial(),
        }
    }
}

impl<'a, N: GroveNode> ProcessContext<'a, N> {
    pub fn process_flow_object(&mut self, fo: &FlowObject<N>) {
        log::trace!("Processing {} flow object", fo.kind.name());
        self.start_flow_obj();
        let style = fo.style.as_ref().filter(|_| fo.kind.applies_own_style());
        if let Some(style) = style {
            self.push_style(style);
        }
        self.process_inner(fo);
        if style.is_some() {
            self.pop_style();
        }
        self.end_flow_obj();
    }

    /// Processes the content of a compound flow object under its content
    /// map, if it has one.
    fn process_content(&mut self, fo: &FlowObject<N>) {
        if let Some(map) = &fo.content_map {
            self.start_map_content(map);
        }
        match &fo.content {
            Some(content) => self.process_sosofo(content),
            None => {
                let mode = self.current_mode.clone();
                self.process_children(&mode);
            }
        }
        if fo.content_map.is_some() {
            self.end_map_content();
        }
    }

    fn compound(
        &mut self,
        fo: &FlowObject<N>,
        start: impl FnOnce(&mut dyn FotBuilder),
        end: impl FnOnce(&mut dyn FotBuilder),
    ) {
        start(self.sink());
        self.process_content(fo);
        end(self.sink());
    }

    fn process_inner(&mut self, fo: &FlowObject<N>) {
        match &fo.kind {
            FlowObjectKind::Sequence => {
                self.compound(fo, |s| s.start_sequence(), |s| s.end_sequence())
            }
            FlowObjectKind::DisplayGroup(nic) => self.compound(
                fo,
                |s| s.start_display_group(nic),
                |s| s.end_display_group(),
            ),
            FlowObjectKind::Paragraph(nic) => {
                self.compound(fo, |s| s.start_paragraph(nic), |s| s.end_paragraph())
            }
            FlowObjectKind::LineField(nic) => {
                self.compound(fo, |s| s.start_line_field(nic), |s| s.end_line_field())
            }
            FlowObjectKind::Box(nic) => self.compound(fo, |s| s.start_box(nic), |s| s.end_box()),
            FlowObjectKind::Leader(nic) => {
                self.compound(fo, |s| s.start_leader(nic), |s| s.end_leader())
            }
            FlowObjectKind::Link(address) => {
                self.compound(fo, |s| s.start_link(address), |s| s.end_link())
            }
            FlowObjectKind::Marginalia => {
                self.compound(fo, |s| s.start_marginalia(), |s| s.end_marginalia())
            }
            FlowObjectKind::Sideline => {
                self.compound(fo, |s| s.start_sideline(), |s| s.end_sideline())
            }
            FlowObjectKind::Score(kind) => {
                self.compound(fo, |s| s.start_score(kind), |s| s.end_score())
            }
            FlowObjectKind::MathSequence => self.compound(
                fo,
                |s| s.start_math_sequence(),
                |s| s.end_math_sequence(),
            ),
            FlowObjectKind::Unmath => self.compound(fo, |s| s.start_unmath(), |s| s.end_unmath()),
            FlowObjectKind::Superscript => {
                self.compound(fo, |s| s.start_superscript(), |s| s.end_superscript())
            }
            FlowObjectKind::Subscript => {
                self.compound(fo, |s| s.start_subscript(), |s| s.end_subscript())
            }
            FlowObjectKind::Grid(nic) => {
                self.compound(fo, |s| s.start_grid(nic), |s| s.end_grid())
            }
            FlowObjectKind::GridCell(nic) => {
                self.compound(fo, |s| s.start_grid_cell(nic), |s| s.end_grid_cell())
            }

            FlowObjectKind::ParagraphBreak(nic) => self.sink().paragraph_break(nic),
            FlowObjectKind::Rule(nic) => self.sink().rule(nic),
            FlowObjectKind::ExternalGraphic(nic) => self.sink().external_graphic(nic),
            FlowObjectKind::Character(nic) => self.sink().character(nic),
            FlowObjectKind::Anchor(nic) => self.sink().anchor(nic),
            FlowObjectKind::AlignmentPoint => self.sink().alignment_point(),
            FlowObjectKind::PageNumber => self.sink().page_number(),
            FlowObjectKind::FormattingInstruction(text) => {
                self.sink().formatting_instruction(text)
            }
            FlowObjectKind::Extension(nic) => {
                let node = self.current_node_id().unwrap_or_default();
                self.sink().extension(nic, node);
            }

            FlowObjectKind::Table(nic) => {
                self.start_table();
                self.sink().start_table(nic);
                self.process_content(fo);
                self.end_table();
                self.sink().end_table();
            }
            FlowObjectKind::TablePart(nic) => {
                self.start_table_part();
                let serial = Serial::TablePart(nic);
                let ports = self.start_serial(&serial);
                self.process_content(fo);
                self.pop_ports();
                self.end_table_part();
                self.end_serial(&serial, ports);
            }
            FlowObjectKind::TableColumn(spec) => {
                if !self.in_table() {
                    self.report(DiagnosticKind::NotInTable, "table column outside a table");
                    return;
                }
                let column_index = match spec.column_index {
                    Some(index) => index,
                    None => self.current_table_column(),
                };
                let nic = TableColumnNic {
                    column_index,
                    n_columns_spanned: spec.n_columns_spanned,
                    width: spec.width,
                };
                self.sink().table_column(&nic);
                self.add_table_column(column_index, spec.n_columns_spanned, fo.style.clone());
            }
            FlowObjectKind::TableRow => {
                if !self.in_table() {
                    self.report(DiagnosticKind::NotInTable, "table row outside a table");
                    self.process_content(fo);
                    return;
                }
                self.start_table_row(fo.style.clone());
                self.process_content(fo);
                self.end_table_row();
            }
            FlowObjectKind::TableCell(spec) => {
                self.table_cell(spec, false, |cx| cx.process_content(fo));
            }

            FlowObjectKind::Fraction => self.serial(fo, &Serial::Fraction),
            FlowObjectKind::Script => self.serial(fo, &Serial::Script),
            FlowObjectKind::Mark => self.serial(fo, &Serial::Mark),
            FlowObjectKind::Fence => self.serial(fo, &Serial::Fence),
            FlowObjectKind::Radical => self.serial(fo, &Serial::Radical),
            FlowObjectKind::MathOperator => self.serial(fo, &Serial::MathOperator),
            FlowObjectKind::MultiMode { principal, modes } => self.serial(
                fo,
                &Serial::MultiMode {
                    principal: principal.as_ref(),
                    modes,
                },
            ),
            FlowObjectKind::CompoundExtension(nic) => self.serial(fo, &Serial::Extension(nic)),

            FlowObjectKind::SimplePageSequence { headers_footers } => {
                self.simple_page_sequence(fo, headers_footers)
            }
        }
    }

    /// Opens the serial protocol and a recorder per port.
    fn start_serial(&mut self, serial: &Serial<'_>) -> Vec<TargetId> {
        let port_names = serial.port_names();
        let ports: Vec<TargetId> = port_names
            .iter()
            .map(|_| self.targets.alloc(SaveFotBuilder::new()))
            .collect();
        serial.start(self.sink());
        self.push_ports(port_names, &ports);
        ports
    }

    /// Replays each port's recorder in port order and closes the protocol.
    fn end_serial(&mut self, serial: &Serial<'_>, ports: Vec<TargetId>) {
        let dest = self.current_target();
        for (i, port) in ports.into_iter().enumerate() {
            serial.start_port(i, self.sink());
            self.targets.emit(port, dest);
            serial.end_port(i, self.sink());
        }
        serial.end(self.sink());
    }

    fn serial(&mut self, fo: &FlowObject<N>, serial: &Serial<'_>) {
        let ports = self.start_serial(serial);
        self.process_content(fo);
        self.pop_ports();
        self.end_serial(serial, ports);
    }

    /// Headers and footers are generated once per page type, before the
    /// body, with the page type visible to `PageTypeTest`.
    fn simple_page_sequence(
        &mut self,
        fo: &FlowObject<N>,
        headers_footers: &[HeaderFooterContent<N>],
    ) {
        let slots: Vec<TargetId> = (0..HeaderFooterSlot::COUNT)
            .map(|_| self.targets.alloc(SaveFotBuilder::new()))
            .collect();
        for slot in HeaderFooterSlot::all() {
            for hf in headers_footers
                .iter()
                .filter(|hf| HeaderFooterSlot::new(slot.page_type(), hf.part) == slot)
            {
                let saved = self.page_type.replace(slot.page_type());
                self.push_principal_port(slots[slot.index()]);
                self.process_sosofo(&hf.content);
                self.pop_principal_port();
                self.page_type = saved;
            }
        }

        let dest = self.current_target();
        self.sink().start_simple_page_sequence_serial();
        for slot in HeaderFooterSlot::all() {
            self.sink().start_simple_page_sequence_header_footer(slot);
            self.targets.emit(slots[slot.index()], dest);
            self.sink().end_simple_page_sequence_header_footer(slot);
        }
        self.sink().end_all_simple_page_sequence_header_footer();
        self.process_content(fo);
        self.sink().end_simple_page_sequence_serial();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galley_fot::FotCommand;

    #[test]
    fn serial_port_names_follow_port_order() {
        assert_eq!(
            Serial::Fraction.port_names(),
            vec![Symbol::from("numerator"), Symbol::from("denominator")]
        );
        assert_eq!(Serial::Radical.port_names().len(), 1);
        assert_eq!(Serial::Script.port_names().len(), ScriptPort::ALL.len());
    }

    #[test]
    fn serial_calls_pair_up() {
        let mut sink = SaveFotBuilder::new();
        let serial = Serial::Fence;
        serial.start(&mut sink);
        for i in 0..serial.port_names().len() {
            serial.start_port(i, &mut sink);
            serial.end_port(i, &mut sink);
        }
        serial.end(&mut sink);
        assert_eq!(sink.commands().first(), Some(&FotCommand::StartFenceSerial));
        assert_eq!(sink.commands().last(), Some(&FotCommand::EndFenceSerial));
        assert_eq!(sink.len(), 6);
    }
}
