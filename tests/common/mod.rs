#![allow(dead_code)]

pub mod fixtures;

use galley::fot::FotCommand;
use galley::grove::testing::{GroveRef, InMemoryGrove};
use galley::{
    CollectingMessenger, ProcessConfig, ProcessStats, Processor, RuleTable, SaveFotBuilder,
};

/// Everything one processing run produced.
pub struct Outcome {
    pub sink: SaveFotBuilder,
    pub messenger: CollectingMessenger,
    pub stats: ProcessStats,
}

impl Outcome {
    pub fn commands(&self) -> &[FotCommand] {
        self.sink.commands()
    }

    /// Every command rendered as text, e.g. `start_table_row`.
    pub fn names(&self) -> Vec<String> {
        self.commands().iter().map(|c| c.to_string()).collect()
    }

    /// The character data written, in order.
    pub fn text(&self) -> Vec<String> {
        text_of(self.commands())
    }

    pub fn count(&self, name: &str) -> usize {
        self.commands().iter().filter(|c| c.name() == name).count()
    }
}

pub fn text_of(commands: &[FotCommand]) -> Vec<String> {
    commands
        .iter()
        .filter_map(|c| match c {
            FotCommand::Characters(s) | FotCommand::CharactersFromNode(_, s) => Some(s.clone()),
            _ => None,
        })
        .collect()
}

pub fn run<'g>(grove: &'g InMemoryGrove, rules: RuleTable<GroveRef<'g>>) -> Outcome {
    run_with(grove, rules, ProcessConfig::default())
}

pub fn run_with<'g>(
    grove: &'g InMemoryGrove,
    rules: RuleTable<GroveRef<'g>>,
    config: ProcessConfig,
) -> Outcome {
    let _ = env_logger::builder().is_test(true).try_init();
    let processor = Processor::builder()
        .with_matcher(rules)
        .with_config(config)
        .build()
        .expect("processor should build");
    let mut sink = SaveFotBuilder::new();
    let mut messenger = CollectingMessenger::new();
    let stats = processor
        .process(&grove.root(), &mut sink, &mut messenger)
        .expect("processing should succeed");
    assert_eq!(stats.diagnostics, messenger.diagnostics.len());
    Outcome {
        sink,
        messenger,
        stats,
    }
}

/// Asserts that every `start_*` is closed by the matching `end_*`, innermost
/// first.
pub fn assert_balanced(commands: &[FotCommand]) {
    let mut open: Vec<&'static str> = Vec::new();
    for (i, command) in commands.iter().enumerate() {
        let name = command.name();
        if command.opens_scope() {
            open.push(&name["start_".len()..]);
        } else if command.closes_scope() {
            let closing = &name["end_".len()..];
            match open.pop() {
                Some(opened) => assert_eq!(
                    opened, closing,
                    "command {i} closes '{closing}' while '{opened}' is open"
                ),
                None => panic!("command {i} closes '{closing}' with nothing open"),
            }
        }
    }
    assert!(open.is_empty(), "scopes left open: {open:?}");
}
