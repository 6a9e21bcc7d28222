use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `kngr` binary.
#[derive(Debug, Parser)]
#[command(name = "kngr", version, about = "kngr - project knowledge graph")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only in logs)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root path (defaults to the current directory)
    #[arg(short, long, global = true)]
    pub project: Option<String>,

    /// Graph file path, bypassing directory resolution
    #[arg(short, long, global = true)]
    pub graph_file: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            project: self.project.clone(),
            graph_file: self.graph_file.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["kngr", "--format", "raw", "--verbose", "read-graph"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::ReadGraph));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["kngr", "search-nodes", "tea", "--quiet"])
            .expect("cli should parse");

        assert!(cli.quiet);
        match cli.command {
            Commands::SearchNodes(args) => assert_eq!(args.query, "tea"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["kngr", "--format", "table", "read-graph"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn names_commands_require_a_name() {
        assert!(Cli::try_parse_from(["kngr", "delete-entities"]).is_err());
        let cli = Cli::try_parse_from(["kngr", "open-nodes", "Alice", "Bob"])
            .expect("cli should parse");
        match cli.command {
            Commands::OpenNodes(args) => assert_eq!(args.names, vec!["Alice", "Bob"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn classify_defaults_depth() {
        let cli = Cli::try_parse_from(["kngr", "classify"]).expect("cli should parse");
        match cli.command {
            Commands::Classify(args) => {
                assert_eq!(args.depth, 2);
                assert!(args.dir.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from([
            "kngr",
            "--project",
            "/tmp/demo",
            "--graph-file",
            "/tmp/demo/kg.json",
            "where",
        ])
        .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.project.as_deref(), Some("/tmp/demo"));
        assert_eq!(flags.graph_file.as_deref(), Some("/tmp/demo/kg.json"));
    }
}
