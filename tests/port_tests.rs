mod common;

use common::fixtures::*;
use common::{assert_balanced, run, text_of};
use galley::fot::MultiModeMode;
use galley::{ContentMap, DiagnosticKind, FlowObjectKind, RuleTable, Sosofo};

fn between(names: &[String], start: &str, end: &str) -> std::ops::Range<usize> {
    let s = names.iter().position(|n| n == start).expect("start marker");
    let e = names.iter().position(|n| n == end).expect("end marker");
    s + 1..e
}

#[test]
fn port_writers_are_serialized_in_arrival_order() {
    let _ = env_logger::builder().is_test(true).try_init();
    let grove = small_doc();
    let rules = RuleTable::new().element(
        "title",
        fo(
            FlowObjectKind::Fraction,
            Sosofo::label(
                "numerator",
                Sosofo::append([
                    Sosofo::literal("A"),
                    Sosofo::label("numerator", Sosofo::literal("B")),
                    Sosofo::label("numerator", Sosofo::literal("C")),
                    Sosofo::literal("A2"),
                ]),
            ),
        ),
    );
    let out = run(&grove, rules);
    assert_balanced(out.commands());

    let names = out.names();
    let numerator = between(
        &names,
        "start_fraction_port(numerator)",
        "end_fraction_port(numerator)",
    );
    assert_eq!(text_of(&out.commands()[numerator]), vec!["A", "A2", "B", "C"]);
    let denominator = between(
        &names,
        "start_fraction_port(denominator)",
        "end_fraction_port(denominator)",
    );
    assert!(denominator.is_empty());
    assert_eq!(out.stats.deferred_recorders, 2);
    assert!(out.messenger.is_empty());
}

#[test]
fn principal_label_at_declaring_level_writes_through() {
    let grove = small_doc();
    let rules = RuleTable::new().element(
        "doc",
        mapped(
            FlowObjectKind::Sequence,
            ContentMap::new().principal("body"),
            Sosofo::append([
                Sosofo::label("body", Sosofo::literal("shallow")),
                Sosofo::literal("after"),
            ]),
        ),
    );
    let out = run(&grove, rules);
    assert_eq!(out.text(), vec!["shallow", "after"]);
    assert_eq!(out.stats.deferred_recorders, 0);
}

#[test]
fn principal_label_below_declaring_level_waits_for_the_child_to_end() {
    let grove = small_doc();
    let rules = RuleTable::new().element(
        "doc",
        mapped(
            FlowObjectKind::Sequence,
            ContentMap::new().principal("body"),
            Sosofo::append([
                paragraph(Sosofo::label("body", Sosofo::literal("deep"))),
                Sosofo::literal("after"),
            ]),
        ),
    );
    let out = run(&grove, rules);
    assert_balanced(out.commands());
    let names = out.names();
    let end_paragraph = names.iter().position(|n| n == "end_paragraph").unwrap();
    let deep = names.iter().position(|n| n == "characters(\"deep\")").unwrap();
    let after = names.iter().position(|n| n == "characters(\"after\")").unwrap();
    assert!(end_paragraph < deep && deep < after);
    assert_eq!(out.stats.deferred_recorders, 1);
}

#[test]
fn unknown_label_is_reported_and_output_stays_put() {
    let grove = small_doc();
    let rules = RuleTable::new().element(
        "doc",
        Sosofo::append([
            Sosofo::label("nowhere", Sosofo::literal("kept")),
            Sosofo::process_children(),
        ]),
    );
    let out = run(&grove, rules);
    assert_balanced(out.commands());
    assert_eq!(out.messenger.count(DiagnosticKind::BadConnection), 1);
    assert_eq!(out.text(), vec!["kept", "Title", "One", "Two"]);
    // root, doc, title and two paras; the failed label adds no node scope
    assert_eq!(out.count("start_node"), 5);
    assert_eq!(out.count("end_node"), 5);
}

#[test]
fn content_map_renames_port_labels() {
    let grove = small_doc();
    let rules = RuleTable::new().element(
        "title",
        mapped(
            FlowObjectKind::Fraction,
            ContentMap::new().port("top", "numerator").port("x", "middle"),
            Sosofo::append([
                Sosofo::label("top", Sosofo::literal("over")),
                Sosofo::label("numerator", Sosofo::literal("stray")),
            ]),
        ),
    );
    let out = run(&grove, rules);
    assert_balanced(out.commands());
    let names = out.names();
    let numerator = between(
        &names,
        "start_fraction_port(numerator)",
        "end_fraction_port(numerator)",
    );
    assert_eq!(text_of(&out.commands()[numerator]), vec!["over"]);
    assert_eq!(out.messenger.count(DiagnosticKind::ContentMapBadPort), 1);
    assert_eq!(out.messenger.count(DiagnosticKind::BadConnection), 1);
    assert!(out.text().contains(&"stray".to_string()));
}

#[test]
fn discard_labeled_drops_only_labelled_content() {
    let grove = small_doc();
    let rules = RuleTable::new().element(
        "doc",
        Sosofo::discard_labeled(
            "notes",
            Sosofo::append([
                Sosofo::literal("x"),
                Sosofo::label("notes", paragraph(Sosofo::literal("hidden"))),
            ]),
        ),
    );
    let out = run(&grove, rules);
    assert_eq!(out.text(), vec!["x"]);
    assert_eq!(out.count("start_paragraph"), 0);
    assert!(out.messenger.is_empty());
}

#[test]
fn multi_mode_modes_are_emitted_in_declaration_order() {
    let mode = |name: &str| MultiModeMode {
        name: name.into(),
        description: String::new(),
    };
    let grove = small_doc();
    let rules = RuleTable::new().element(
        "title",
        fo(
            FlowObjectKind::MultiMode {
                principal: None,
                modes: vec![mode("short"), mode("long")],
            },
            Sosofo::append([
                Sosofo::label("long", Sosofo::literal("The long title")),
                Sosofo::label("short", Sosofo::literal("Short")),
                Sosofo::literal("principal"),
            ]),
        ),
    );
    let out = run(&grove, rules);
    assert_balanced(out.commands());
    let names = out.names();
    let serial = between(&names, "start_multi_mode_serial", "end_multi_mode_serial");
    assert_eq!(
        text_of(&out.commands()[serial]),
        vec!["principal", "Short", "The long title"]
    );
}
