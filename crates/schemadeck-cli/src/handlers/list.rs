//! List command handler

use crate::error::Result;
use crate::output::OutputWriter;
use schemadeck_core::SchemaRegistry;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct SchemaSummary<'a> {
    name: &'a str,
    title: &'a str,
    headline: &'a str,
}

/// Handle the list command
pub fn handle_list(output: &mut OutputWriter) -> Result<()> {
    let registry = SchemaRegistry::builtin()?;
    let summaries: Vec<SchemaSummary> = registry
        .entries()
        .iter()
        .map(|entry| SchemaSummary {
            name: entry.name(),
            title: &entry.schema.title,
            headline: &entry.headline,
        })
        .collect();

    if !output.is_human() {
        return output.data(&summaries);
    }

    let rows = summaries
        .iter()
        .map(|s| vec![s.name.to_string(), s.title.to_string(), s.headline.to_string()])
        .collect();
    output.table(&["Schema", "Title", "Shows"], rows)?;
    output.info("Run `schemadeck describe <schema>` for field details")
}
