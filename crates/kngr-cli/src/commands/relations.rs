use kngr_core::requests::RelationInput;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::PayloadArgs;
use crate::commands::shared::payload::load_records;
use crate::context::AppContext;
use crate::output::output;

/// Handle `kngr create-relations`.
pub fn create(args: &PayloadArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let inputs: Vec<RelationInput> = load_records(&args.payload, "relations")?;
    let mut store = ctx.open_store();
    let created = store.create_relations(&inputs)?;
    output(&created, flags.format)
}

/// Handle `kngr delete-relations`.
pub fn delete(args: &PayloadArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let inputs: Vec<RelationInput> = load_records(&args.payload, "relations")?;
    let mut store = ctx.open_store();
    let graph = store.delete_relations(&inputs)?;
    output(&graph, flags.format)
}
