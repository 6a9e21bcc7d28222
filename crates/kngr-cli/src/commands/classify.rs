use std::path::PathBuf;

use kngr_graph::ProjectClassifier;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ClassifyArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `kngr classify`.
pub fn handle(args: &ClassifyArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let root = args
        .dir
        .as_ref()
        .map_or_else(|| ctx.project_dir.clone(), PathBuf::from);
    if !root.is_dir() {
        anyhow::bail!("cannot classify '{}': not a directory", root.display());
    }
    let classification = ProjectClassifier::new(root)
        .with_max_depth(args.depth)
        .classify();
    output(&classification, flags.format)
}
