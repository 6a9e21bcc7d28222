use serde::Serialize;

use crate::cli::OutputFormat;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use kngr_core::{Entity, KnowledgeGraph};

    use super::render;
    use crate::cli::OutputFormat;

    #[test]
    fn json_render_is_valid_json() {
        let graph = KnowledgeGraph {
            entities: vec![Entity::new("Alice", "person")],
            ..KnowledgeGraph::default()
        };
        let out = render(&graph, OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["entities"][0]["name"], "Alice");
        assert_eq!(parsed["project_type"], "generic");
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let graph = KnowledgeGraph {
            entities: vec![Entity::new("Alice", "person")],
            ..KnowledgeGraph::default()
        };
        let out = render(&graph, OutputFormat::Raw).expect("raw render should work");
        assert!(!out.contains('\n'));
        let parsed: KnowledgeGraph = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed, graph);
    }
}
