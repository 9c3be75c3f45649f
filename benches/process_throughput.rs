//! Processing throughput benchmarks
//!
//! Measures the driver on:
//! - Flat documents with many siblings (100, 1000, 10000 items)
//! - Explicit node lists, which go through the process-node guard
//! - Tables with random row and column spans
//!
//! Run benchmarks: `cargo bench --bench process_throughput`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use galley::grove::testing::{GroveBuilder, GroveRef, InMemoryGrove};
use galley::process::{EvalValue, TableCellSpec};
use galley::{
    CollectingMessenger, FlowObject, FlowObjectKind, GroveNode, Mode, Processor, Rule, RulePattern,
    RuleTable, SaveFotBuilder, Sosofo,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

fn flat_list(n: usize) -> InMemoryGrove {
    let mut builder = GroveBuilder::new().start_element("list");
    for _ in 0..n {
        builder = builder.element("item", |b| b.text("x"));
    }
    builder.end_element().finish()
}

fn run<'g>(grove: &'g InMemoryGrove, rules: RuleTable<GroveRef<'g>>) -> usize {
    let processor = Processor::builder()
        .with_matcher(rules)
        .build()
        .expect("Failed to build processor");
    let mut sink = SaveFotBuilder::new();
    let mut messenger = CollectingMessenger::new();
    processor
        .process(&grove.root(), &mut sink, &mut messenger)
        .expect("Processing failed");
    sink.len()
}

fn item_rules<'g>() -> RuleTable<GroveRef<'g>> {
    RuleTable::new().element(
        "item",
        FlowObject::new(FlowObjectKind::Paragraph(Default::default())).into_sosofo(),
    )
}

/// Benchmark a plain child walk over flat documents
fn benchmark_flat_walk(c: &mut Criterion) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut group = c.benchmark_group("flat_walk");
    for count in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));
        let grove = flat_list(count);
        group.bench_with_input(BenchmarkId::new("items", count), &grove, |b, grove| {
            b.iter(|| black_box(run(grove, item_rules())));
        });
    }
    group.finish();
}

/// Benchmark explicit node lists, each node going through the loop guard
fn benchmark_guarded_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("guarded_list");
    for count in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));
        let grove = flat_list(count);
        group.bench_with_input(BenchmarkId::new("items", count), &grove, |b, grove| {
            b.iter(|| {
                let rules = item_rules().with(
                    Mode::initial(),
                    RulePattern::Element("list".into()),
                    Rule::expression(|cx| {
                        Ok(EvalValue::Sosofo(Sosofo::ProcessNodeList {
                            nodes: cx.node.children().collect(),
                            mode: None,
                        }))
                    }),
                );
                black_box(run(grove, rules))
            });
        });
    }
    group.finish();
}

fn random_table<N>(rng: &mut StdRng, n_cells: usize) -> Sosofo<N> {
    let cells = (0..n_cells)
        .map(|_| {
            let spec = TableCellSpec {
                n_rows_spanned: rng.random_range(1..=3),
                n_columns_spanned: rng.random_range(1..=2),
                ends_row: rng.random_bool(0.25),
                ..TableCellSpec::default()
            };
            FlowObject::new(FlowObjectKind::TableCell(spec))
                .with_content(Sosofo::literal("cell"))
                .into_sosofo()
        })
        .collect();
    let part = FlowObject::new(FlowObjectKind::TablePart(Default::default()))
        .with_content(Sosofo::Append(cells))
        .into_sosofo();
    FlowObject::new(FlowObjectKind::Table(Default::default()))
        .with_content(part)
        .into_sosofo()
}

/// Benchmark table layout with random spans
fn benchmark_tables(c: &mut Criterion) {
    let mut group = c.benchmark_group("tables");
    let grove = flat_list(0);
    for count in [10, 100, 1_000] {
        group.throughput(Throughput::Elements(count as u64));
        let mut rng = StdRng::seed_from_u64(count as u64);
        group.bench_with_input(BenchmarkId::new("cells", count), &count, |b, &count| {
            b.iter(|| {
                let rules = RuleTable::new().element("list", random_table(&mut rng, count));
                black_box(run(&grove, rules))
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_flat_walk,
    benchmark_guarded_list,
    benchmark_tables
);
criterion_main!(benches);
