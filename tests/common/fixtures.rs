use galley::grove::testing::{GroveBuilder, InMemoryGrove};
use galley::process::{TableCellSpec, TableColumnSpec};
use galley::{ContentMap, FlowObject, FlowObjectKind, Sosofo};

/// `<doc><title>Title</title><para>One</para><para>Two</para></doc>`
pub fn small_doc() -> InMemoryGrove {
    GroveBuilder::new()
        .element("doc", |b| {
            b.element("title", |b| b.text("Title"))
                .element("para", |b| b.text("One"))
                .element("para", |b| b.text("Two"))
        })
        .finish()
}

/// A `list` element with `n` empty `item` children.
pub fn flat_list(n: usize) -> InMemoryGrove {
    let mut builder = GroveBuilder::new().start_element("list");
    for _ in 0..n {
        builder = builder.empty_element("item");
    }
    builder.end_element().finish()
}

pub fn fo<N>(kind: FlowObjectKind<N>, content: Sosofo<N>) -> Sosofo<N> {
    FlowObject::new(kind).with_content(content).into_sosofo()
}

pub fn mapped<N>(kind: FlowObjectKind<N>, map: ContentMap, content: Sosofo<N>) -> Sosofo<N> {
    FlowObject::new(kind)
        .with_content(content)
        .with_content_map(map)
        .into_sosofo()
}

pub fn sequence<N>(content: Sosofo<N>) -> Sosofo<N> {
    fo(FlowObjectKind::Sequence, content)
}

pub fn paragraph<N>(content: Sosofo<N>) -> Sosofo<N> {
    fo(FlowObjectKind::Paragraph(Default::default()), content)
}

pub fn table<N>(content: Vec<Sosofo<N>>) -> Sosofo<N> {
    fo(FlowObjectKind::Table(Default::default()), Sosofo::Append(content))
}

pub fn table_part<N>(content: Vec<Sosofo<N>>) -> Sosofo<N> {
    fo(FlowObjectKind::TablePart(Default::default()), Sosofo::Append(content))
}

pub fn column<N>(spec: TableColumnSpec) -> Sosofo<N> {
    FlowObject::new(FlowObjectKind::TableColumn(spec)).into_sosofo()
}

pub fn row<N>(cells: Vec<Sosofo<N>>) -> Sosofo<N> {
    fo(FlowObjectKind::TableRow, Sosofo::Append(cells))
}

pub fn cell<N>(text: &str) -> Sosofo<N> {
    cell_with(TableCellSpec::default(), text)
}

pub fn cell_with<N>(spec: TableCellSpec, text: &str) -> Sosofo<N> {
    fo(FlowObjectKind::TableCell(spec), Sosofo::literal(text))
}

pub fn spanning<N>(rows: usize, cols: usize, text: &str) -> Sosofo<N> {
    cell_with(
        TableCellSpec {
            n_rows_spanned: rows,
            n_columns_spanned: cols,
            ..TableCellSpec::default()
        },
        text,
    )
}

pub fn ending_row<N>(text: &str) -> Sosofo<N> {
    cell_with(
        TableCellSpec {
            ends_row: true,
            ..TableCellSpec::default()
        },
        text,
    )
}
