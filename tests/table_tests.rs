mod common;

use common::fixtures::*;
use common::{assert_balanced, run, run_with};
use galley::fot::Characteristic;
use galley::process::{TableCellSpec, TableColumnSpec};
use galley::{
    DiagnosticKind, FlowObject, FlowObjectKind, GroveNode, ProcessConfig, RuleTable, Sosofo, Style,
};
use std::sync::Arc;

/// Rules that turn `doc` into a one-part table with the given content.
fn one_table<N: GroveNode>(content: Vec<Sosofo<N>>) -> RuleTable<N> {
    RuleTable::new().element("doc", table(vec![table_part(content)]))
}

#[test]
fn row_boundaries_from_cells_match_explicit_rows() {
    let grove = small_doc();
    let explicit = run(
        &grove,
        one_table(vec![
            row(vec![cell("a"), cell("b")]),
            row(vec![cell("c"), cell("d")]),
        ]),
    );
    let by_ends_row = run(
        &grove,
        one_table(vec![cell("a"), ending_row("b"), cell("c"), ending_row("d")]),
    );
    let starts = |text| {
        cell_with(
            TableCellSpec {
                starts_row: true,
                ..TableCellSpec::default()
            },
            text,
        )
    };
    let by_starts_row = run(
        &grove,
        one_table(vec![cell("a"), cell("b"), starts("c"), cell("d")]),
    );

    assert_balanced(explicit.commands());
    assert_eq!(explicit.count("start_table_row"), 2);
    assert_eq!(explicit.commands(), by_ends_row.commands());
    assert_eq!(explicit.commands(), by_starts_row.commands());
}

#[test]
fn row_span_covers_the_next_row() {
    let grove = small_doc();
    let out = run(
        &grove,
        one_table(vec![
            row(vec![spanning(2, 1, "A"), cell("B")]),
            row(vec![cell("C")]),
        ]),
    );
    assert_balanced(out.commands());
    let names = out.names();
    assert!(names.contains(&"start_table_cell(col 0, span 1x2)".to_string()));
    assert!(names.contains(&"start_table_cell(col 1, span 1x1)".to_string()));
    assert!(!names.iter().any(|n| n.ends_with("missing)")));
    assert_eq!(out.stats.span_reconciliations, 1);
    assert_eq!(out.stats.filler_rows, 0);
}

#[test]
fn spans_past_the_part_end_get_filler_rows() {
    let grove = small_doc();
    let out = run(&grove, one_table(vec![row(vec![spanning(3, 1, "A"), cell("B")])]));
    assert_balanced(out.commands());
    assert_eq!(out.stats.filler_rows, 2);
    assert_eq!(out.count("start_table_row"), 3);
    // column 1 is free in both filler rows
    let missing = out.names().iter().filter(|n| n.ends_with("missing)")).count();
    assert_eq!(missing, 2);
    assert!(out.messenger.is_empty());
}

#[test]
fn spans_past_the_part_end_are_reported_without_filler_rows() {
    let grove = small_doc();
    let config = ProcessConfig {
        synthesize_filler_rows: false,
        ..ProcessConfig::default()
    };
    let out = run_with(
        &grove,
        one_table(vec![row(vec![spanning(3, 1, "A"), cell("B")])]),
        config,
    );
    assert_balanced(out.commands());
    assert_eq!(out.stats.filler_rows, 0);
    assert_eq!(out.count("start_table_row"), 1);
    assert_eq!(out.messenger.count(DiagnosticKind::RowSpanOverflow), 1);
}

#[test]
fn short_rows_are_padded_with_missing_cells() {
    let grove = small_doc();
    let at = |column, text| {
        cell_with(
            TableCellSpec {
                column_index: Some(column),
                ..TableCellSpec::default()
            },
            text,
        )
    };
    let out = run(
        &grove,
        one_table(vec![
            row(vec![cell("a"), cell("b"), cell("c")]),
            row(vec![at(1, "e")]),
        ]),
    );
    assert_balanced(out.commands());
    let names = out.names();
    let missing: Vec<&String> = names.iter().filter(|n| n.ends_with("missing)")).collect();
    assert_eq!(
        missing,
        vec![
            "start_table_cell(col 0, span 1x1, missing)",
            "start_table_cell(col 2, span 1x1, missing)",
        ]
    );
    assert_eq!(out.text(), vec!["a", "b", "c", "e"]);
}

#[test]
fn column_and_row_styles_wrap_their_cells() {
    let grove = small_doc();
    let narrow = Arc::new(Style::new().with(Characteristic::FontSize(8.0)));
    let shaded = Arc::new(Style::new().with(Characteristic::Hyphenate(false)));
    let column = FlowObject::new(FlowObjectKind::TableColumn(TableColumnSpec::default()))
        .with_style(narrow)
        .into_sosofo();
    let styled_row = FlowObject::new(FlowObjectKind::TableRow)
        .with_style(shaded)
        .with_content(Sosofo::Append(vec![cell("x"), cell("y")]))
        .into_sosofo();
    let out = run(&grove, one_table(vec![column, styled_row]));
    assert_balanced(out.commands());

    let names = out.names();
    let first_row = names.iter().position(|n| n == "start_table_row").unwrap();
    assert_eq!(
        &names[first_row..first_row + 6],
        &[
            "start_table_row",
            "set(font-size)",
            "start_sequence",
            "set(hyphenate?)",
            "start_sequence",
            "start_table_cell(col 0, span 1x1)",
        ]
    );
    // the second column was never declared, so only the row style applies
    let second = names
        .iter()
        .position(|n| n == "start_table_cell(col 1, span 1x1)")
        .unwrap();
    assert_eq!(names[second - 1], "start_sequence");
    assert_eq!(names[second - 2], "set(hyphenate?)");
    assert_ne!(names[second - 3], "start_sequence");
}

#[test]
fn cells_outside_tables_keep_their_content() {
    let grove = small_doc();
    let rules = RuleTable::new().element("title", cell("loose"));
    let out = run(&grove, rules);
    assert_eq!(out.messenger.count(DiagnosticKind::NotInTable), 1);
    assert_eq!(out.count("start_table_cell"), 0);
    assert_eq!(out.text(), vec!["loose", "One", "Two"]);
}

#[test]
fn nested_tables_keep_separate_cursors() {
    let grove = small_doc();
    let inner = fo(
        FlowObjectKind::TableCell(TableCellSpec::default()),
        table(vec![table_part(vec![row(vec![cell("i1"), cell("i2")])])]),
    );
    let out = run(&grove, one_table(vec![row(vec![cell("o1"), inner])]));
    assert_balanced(out.commands());
    let names = out.names();
    let cells: Vec<&String> = names
        .iter()
        .filter(|n| n.starts_with("start_table_cell"))
        .collect();
    assert_eq!(
        cells,
        vec![
            "start_table_cell(col 0, span 1x1)",
            "start_table_cell(col 1, span 1x1)",
            "start_table_cell(col 0, span 1x1)",
            "start_table_cell(col 1, span 1x1)",
        ]
    );
    assert_eq!(out.stats.span_reconciliations, 2);
}

#[test]
fn unknown_label_inside_a_row_does_not_close_it() {
    let grove = small_doc();
    let out = run(
        &grove,
        one_table(vec![
            cell("a"),
            Sosofo::label("nowhere", Sosofo::literal("x")),
            cell("b"),
        ]),
    );

    assert_balanced(out.commands());
    assert_eq!(out.count("start_table_row"), 1);
    assert_eq!(out.messenger.count(DiagnosticKind::BadConnection), 1);
    let names = out.names();
    assert!(names.iter().any(|n| n == "start_table_cell(col 1, span 1x1)"));
    assert!(!names.iter().any(|n| n.ends_with("missing)")));
}
