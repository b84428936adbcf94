//! CSV serialization of query results for downstream tooling.

use crate::graph::NetworkSnapshot;
use crate::table::{Cell, Table};
use anyhow::{Context, Result};
use csv::Writer;
use std::path::Path;

/// Write a table as CSV, header first.
pub fn write_table_csv(table: &Table, path: &Path) -> Result<()> {
    let mut writer = Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    writer.write_record(&table.header)?;
    for row in &table.rows {
        let fields: Vec<String> = row.iter().map(cell_field).collect();
        writer.write_record(&fields)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the co-author network as `nodes.csv` and `edges.csv` in `dir`.
/// Edges reference authors by display name, one undirected pair per row.
pub fn write_network_csv(snapshot: &NetworkSnapshot, dir: &Path) -> Result<()> {
    let nodes_path = dir.join("nodes.csv");
    let mut nodes = Writer::from_path(&nodes_path)
        .with_context(|| format!("Failed to create CSV file: {}", nodes_path.display()))?;
    nodes.write_record(["author", "collaborators"])?;
    for node in &snapshot.nodes {
        let count = node.collaborators.to_string();
        nodes.write_record([node.name.as_str(), count.as_str()])?;
    }
    nodes.flush()?;

    let edges_path = dir.join("edges.csv");
    let mut edges = Writer::from_path(&edges_path)
        .with_context(|| format!("Failed to create CSV file: {}", edges_path.display()))?;
    edges.write_record(["source", "target"])?;
    for &(a, b) in &snapshot.edges {
        edges.write_record([
            snapshot.nodes[a.index()].name.as_str(),
            snapshot.nodes[b.index()].name.as_str(),
        ])?;
    }
    edges.flush()?;
    Ok(())
}

fn cell_field(cell: &Cell) -> String {
    match cell {
        Cell::Text(s) => s.clone(),
        Cell::Int(n) => n.to_string(),
        Cell::Num(x) => format_number(*x),
        Cell::Nums(xs) => xs
            .iter()
            .map(|&x| format_number(x))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Two decimal places with trailing zeros (and a bare decimal point)
/// trimmed: 2.50 renders as "2.5", 3.00 as "3".
fn format_number(x: f64) -> String {
    let formatted = format!("{x:.2}");
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
