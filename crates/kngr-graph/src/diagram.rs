//! Mermaid diagram companion for the graph file.
//!
//! The diagram is rebuilt from the full graph on every call. The flavor
//! follows the project type:
//!
//! | project type   | Mermaid syntax  |
//! |----------------|-----------------|
//! | `software`     | `classDiagram`  |
//! | `data_science` | `flowchart TD`  |
//! | `generic`      | `graph LR`      |
//!
//! Each entity gets a node id derived from its name (`Alice` becomes
//! `n_Alice`), so ids survive deletions elsewhere in the graph. Names that
//! sanitize to the same id get a numeric suffix. The markdown ends with a
//! metadata footer that [`scan_footer`] can read back.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use kngr_core::{Entity, KnowledgeGraph, MetadataValue, ProjectType};
use serde::Serialize;

use crate::error::GraphError;

/// Class members rendered per entity in the class-diagram flavor.
const MAX_MEMBERS: usize = 5;
/// Character budget for a rendered class member, ellipsis included.
const MAX_MEMBER_CHARS: usize = 50;
const ELLIPSIS: &str = "...";

const FOOTER_HEADING: &str = "Graph Metadata";
const PROJECT_METADATA_HEADING: &str = "Project Metadata";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Fill/stroke colors for well-known entity types in the flowchart flavors.
fn type_style(entity_type: &str) -> Option<&'static str> {
    match entity_type.to_ascii_lowercase().as_str() {
        "person" => Some("fill:#e1f5fe,stroke:#0277bd"),
        "concept" => Some("fill:#f3e5f5,stroke:#6a1b9a"),
        "file" => Some("fill:#e8f5e9,stroke:#2e7d32"),
        "task" => Some("fill:#fff3e0,stroke:#ef6c00"),
        "project" => Some("fill:#fce4ec,stroke:#ad1457"),
        _ => None,
    }
}

/// Summary of a diagram written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramReport {
    pub path: PathBuf,
    pub project_type: ProjectType,
    pub entity_count: usize,
    pub relation_count: usize,
    /// Edges actually drawn; relations with a missing endpoint are skipped.
    pub rendered_edges: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DiagramRenderer;

impl DiagramRenderer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the markdown document with an explicit timestamp.
    /// Returns the document and the number of edges drawn.
    #[must_use]
    pub fn render_at(&self, graph: &KnowledgeGraph, generated_at: DateTime<Utc>) -> (String, usize) {
        let ids = node_ids(graph);

        let mut out = String::from("# Knowledge Graph\n\n```mermaid\n");
        let edges = match graph.project_type {
            ProjectType::Software => render_class_diagram(&mut out, graph, &ids),
            ProjectType::DataScience => render_flowchart(&mut out, "flowchart TD", graph, &ids),
            ProjectType::Generic => render_flowchart(&mut out, "graph LR", graph, &ids),
        };
        out.push_str("```\n\n");
        render_footer(&mut out, graph, generated_at);
        (out, edges)
    }

    /// Render and write the document to `path`, creating the parent directory.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Io`] if the directory or file cannot be written.
    pub fn write(&self, graph: &KnowledgeGraph, path: &Path) -> Result<DiagramReport, GraphError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| GraphError::io(parent, e))?;
        }
        let (document, rendered_edges) = self.render_at(graph, Utc::now());
        fs::write(path, document).map_err(|e| GraphError::io(path, e))?;

        Ok(DiagramReport {
            path: path.to_path_buf(),
            project_type: graph.project_type,
            entity_count: graph.entity_count(),
            relation_count: graph.relation_count(),
            rendered_edges,
        })
    }
}

fn render_class_diagram(out: &mut String, graph: &KnowledgeGraph, ids: &HashMap<&str, String>) -> usize {
    out.push_str("classDiagram\n");
    for entity in &graph.entities {
        let id = &ids[entity.name.as_str()];
        let _ = writeln!(out, "    class {id}[\"{}\"] {{", escape_label(&entity.name));
        let _ = writeln!(out, "        <<{}>>", member_text(&entity.entity_type));
        for observation in entity.observations.iter().take(MAX_MEMBERS) {
            let _ = writeln!(out, "        +{}", member_text(observation));
        }
        out.push_str("    }\n");
    }
    render_edges(out, graph, ids, |out, from, to, label| {
        let _ = writeln!(out, "    {from} --> {to} : {}", member_text(label));
    })
}

fn render_flowchart(
    out: &mut String,
    header: &str,
    graph: &KnowledgeGraph,
    ids: &HashMap<&str, String>,
) -> usize {
    out.push_str(header);
    out.push('\n');
    for entity in &graph.entities {
        let _ = writeln!(out, "    {}[\"{}\"]", ids[entity.name.as_str()], node_label(entity));
    }
    let edges = render_edges(out, graph, ids, |out, from, to, label| {
        let _ = writeln!(out, "    {from} -->|\"{}\"| {to}", escape_label(label));
    });
    for entity in &graph.entities {
        if let Some(style) = type_style(&entity.entity_type) {
            let _ = writeln!(out, "    style {} {style}", ids[entity.name.as_str()]);
        }
    }
    edges
}

/// Name-derived Mermaid ids, assigned in entity order.
fn node_ids(graph: &KnowledgeGraph) -> HashMap<&str, String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut ids = HashMap::with_capacity(graph.entities.len());
    for entity in &graph.entities {
        if ids.contains_key(entity.name.as_str()) {
            continue;
        }
        let base = node_id_base(&entity.name);
        let mut id = base.clone();
        let mut suffix = 2;
        while used.contains(&id) {
            id = format!("{base}_{suffix}");
            suffix += 1;
        }
        used.insert(id.clone());
        ids.insert(entity.name.as_str(), id);
    }
    ids
}

fn node_id_base(name: &str) -> String {
    let mut id = String::with_capacity(name.len() + 2);
    id.push_str("n_");
    id.extend(
        name.chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' }),
    );
    id
}

fn render_edges(
    out: &mut String,
    graph: &KnowledgeGraph,
    ids: &HashMap<&str, String>,
    mut edge: impl FnMut(&mut String, &str, &str, &str),
) -> usize {
    let mut drawn = 0;
    for relation in &graph.relations {
        let (Some(from), Some(to)) = (
            ids.get(relation.from_entity.as_str()),
            ids.get(relation.to_entity.as_str()),
        ) else {
            continue;
        };
        edge(out, from, to, &relation.relation_type);
        drawn += 1;
    }
    drawn
}

fn render_footer(out: &mut String, graph: &KnowledgeGraph, generated_at: DateTime<Utc>) {
    let _ = writeln!(out, "## {FOOTER_HEADING}\n");
    let _ = writeln!(out, "- **Project Type**: {}", graph.project_type);
    let _ = writeln!(out, "- **Entities**: {}", graph.entity_count());
    let _ = writeln!(out, "- **Relations**: {}", graph.relation_count());
    let _ = writeln!(out, "- **Generated**: {}", generated_at.format(TIMESTAMP_FORMAT));

    if graph.project_metadata.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n### {PROJECT_METADATA_HEADING}\n");
    for (key, value) in &graph.project_metadata {
        let rendered = match value {
            MetadataValue::Flag(true) => String::from("Yes"),
            MetadataValue::Flag(false) => String::from("No"),
            MetadataValue::Count(count) => count.to_string(),
        };
        let _ = writeln!(out, "- **{key}**: {rendered}");
    }
}

fn node_label(entity: &Entity) -> String {
    format!(
        "{}<br/><i>{}</i>",
        escape_label(&entity.name),
        escape_label(&entity.entity_type)
    )
}

/// Mermaid-safe quoted label text.
fn escape_label(text: &str) -> String {
    text.replace('"', "#quot;")
        .replace(['\n', '\r'], " ")
}

/// Single-line class member text, truncated to the member budget.
fn member_text(text: &str) -> String {
    let flat: String = text
        .chars()
        .map(|c| match c {
            '\n' | '\r' => ' ',
            '{' => '(',
            '}' => ')',
            '"' => '\'',
            other => other,
        })
        .collect();
    truncate_chars(&flat, MAX_MEMBER_CHARS)
}

/// Cut `text` to at most `max` characters, the ellipsis counted.
fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

// ---------------------------------------------------------------------------
// Footer scanner
// ---------------------------------------------------------------------------

/// Metadata footer read back from a rendered diagram document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiagramFooter {
    pub project_type: Option<ProjectType>,
    pub entity_count: Option<usize>,
    pub relation_count: Option<usize>,
    pub generated: Option<String>,
    /// Project metadata as rendered (`Yes`/`No` for flags).
    pub metadata: BTreeMap<String, String>,
}

/// One classified markdown line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Heading { level: usize, text: &'a str },
    Fence,
    Field { key: &'a str, value: &'a str },
    Other,
}

fn classify_line(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    if trimmed.starts_with("```") {
        return Line::Fence;
    }
    if trimmed.starts_with('#') {
        let level = trimmed.chars().take_while(|c| *c == '#').count();
        let text = trimmed[level..].trim();
        return Line::Heading { level, text };
    }
    if let Some(rest) = trimmed.strip_prefix("- **") {
        if let Some((key, value)) = rest.split_once("**:") {
            return Line::Field {
                key: key.trim(),
                value: value.trim(),
            };
        }
    }
    Line::Other
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Graph,
    Project,
}

/// Parse the metadata footer out of a diagram document.
///
/// Returns `None` when the document has no `Graph Metadata` section.
/// Fields with unparseable values are left unset; bullets that do not have
/// the `- **key**: value` shape are skipped. Lines inside code fences are
/// never treated as footer content.
#[must_use]
pub fn scan_footer(markdown: &str) -> Option<DiagramFooter> {
    let mut footer = DiagramFooter::default();
    let mut section = Section::None;
    let mut in_fence = false;
    let mut seen = false;

    for line in markdown.lines() {
        match classify_line(line) {
            Line::Fence => in_fence = !in_fence,
            _ if in_fence => {}
            Line::Heading { level, text } => {
                section = match (level, text) {
                    (2, FOOTER_HEADING) => {
                        seen = true;
                        Section::Graph
                    }
                    (3, PROJECT_METADATA_HEADING) if seen => Section::Project,
                    _ => Section::None,
                };
            }
            Line::Field { key, value } => match section {
                Section::Graph => match key {
                    "Project Type" => footer.project_type = value.parse().ok(),
                    "Entities" => footer.entity_count = value.parse().ok(),
                    "Relations" => footer.relation_count = value.parse().ok(),
                    "Generated" => footer.generated = Some(value.to_string()),
                    _ => {}
                },
                Section::Project => {
                    footer.metadata.insert(key.to_string(), value.to_string());
                }
                Section::None => {}
            },
            Line::Other => {}
        }
    }

    seen.then_some(footer)
}
