use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create entities from a JSON array of {name, entityType, observations?}.
    #[command(name = "create-entities")]
    CreateEntities(PayloadArgs),
    /// Create relations from a JSON array of {from, to, relationType}.
    #[command(name = "create-relations")]
    CreateRelations(PayloadArgs),
    /// Add observations from a JSON array of {entityName, contents}.
    #[command(name = "add-observations")]
    AddObservations(PayloadArgs),
    /// Delete entities and every relation touching them.
    #[command(name = "delete-entities")]
    DeleteEntities(NamesArgs),
    /// Delete observations from a JSON array of {entityName, observations}.
    #[command(name = "delete-observations")]
    DeleteObservations(PayloadArgs),
    /// Delete relations from a JSON array of {from, to, relationType}.
    #[command(name = "delete-relations")]
    DeleteRelations(PayloadArgs),
    /// Print the whole graph.
    #[command(name = "read-graph")]
    ReadGraph,
    /// Case-insensitive search over names, types, and observations.
    #[command(name = "search-nodes")]
    SearchNodes(SearchArgs),
    /// Exact-name lookup.
    #[command(name = "open-nodes")]
    OpenNodes(NamesArgs),
    /// Regenerate the Mermaid diagram next to the graph file.
    Diagram,
    /// Classify a directory as software, data science, or generic.
    Classify(ClassifyArgs),
    /// Show where the graph file lives and which tier chose it.
    Where,
}

/// A JSON payload argument.
#[derive(Clone, Debug, Args)]
pub struct PayloadArgs {
    /// JSON array (or single object); `-` reads from stdin.
    pub payload: String,
}

/// One or more entity names.
#[derive(Clone, Debug, Args)]
pub struct NamesArgs {
    #[arg(required = true, num_args = 1..)]
    pub names: Vec<String>,
}

/// Arguments for `kngr search-nodes`.
#[derive(Clone, Debug, Args)]
pub struct SearchArgs {
    pub query: String,
}

/// Arguments for `kngr classify`.
#[derive(Clone, Debug, Args)]
pub struct ClassifyArgs {
    /// Directory to scan (defaults to the project root).
    pub dir: Option<String>,
    /// Scan depth below the directory.
    #[arg(long, default_value_t = 2)]
    pub depth: usize,
}
