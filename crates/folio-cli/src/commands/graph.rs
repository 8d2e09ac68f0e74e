use anyhow::{Context, Result};
use folio_core::{EntityGraph, FolioConfig, FragmentSource, FragmentValue};
use std::path::PathBuf;

use crate::sources;

/// Prints the reconciled entity graph of a page, one node per block. Mostly
/// a debugging aid for checking what the extraction actually carries.
pub async fn execute(config: FolioConfig, title: String, microdata: Option<PathBuf>) -> Result<()> {
    let source = sources::fragment_source(&config, microdata)?;
    let fragments = source
        .fragments(&title)
        .await
        .with_context(|| format!("Failed to extract fragments for \"{title}\""))?;
    let graph = EntityGraph::build(fragments);

    for (uri, fragment) in graph.iter() {
        match uri {
            Some(uri) => println!("{uri}"),
            None => println!("(anonymous)"),
        }
        if !fragment.types.is_empty() {
            println!("  types: {}", fragment.types.join(", "));
        }
        for (name, values) in &fragment.properties {
            let rendered: Vec<String> = values.iter().map(render_value).collect();
            println!("  {name}: {}", rendered.join(", "));
        }
        println!();
    }
    Ok(())
}

fn render_value(value: &FragmentValue) -> String {
    match value {
        FragmentValue::Literal(literal) => format!("{literal:?}"),
        FragmentValue::Node(node) => match &node.id {
            Some(id) => format!("-> {id}"),
            None => match node.first_literal("name") {
                Some(name) => format!("{{name: {name:?}}}"),
                None => "{anonymous node}".to_string(),
            },
        },
    }
}
