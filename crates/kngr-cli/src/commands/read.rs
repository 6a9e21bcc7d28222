use crate::cli::GlobalFlags;
use crate::cli::root_commands::{NamesArgs, SearchArgs};
use crate::context::AppContext;
use crate::output::output;

/// Handle `kngr read-graph`.
pub fn read_graph(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(ctx.open_store().graph(), flags.format)
}

/// Handle `kngr search-nodes`.
pub fn search(args: &SearchArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&ctx.open_store().search_nodes(&args.query), flags.format)
}

/// Handle `kngr open-nodes`.
pub fn open(args: &NamesArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&ctx.open_store().open_nodes(&args.names), flags.format)
}
