use kngr_core::requests::EntityInput;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{NamesArgs, PayloadArgs};
use crate::commands::shared::payload::load_records;
use crate::context::AppContext;
use crate::output::output;

/// Handle `kngr create-entities`.
pub fn create(args: &PayloadArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let inputs: Vec<EntityInput> = load_records(&args.payload, "entities")?;
    let mut store = ctx.open_store();
    let created = store.create_entities(&inputs)?;
    output(&created, flags.format)
}

/// Handle `kngr delete-entities`.
pub fn delete(args: &NamesArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut store = ctx.open_store();
    let graph = store.delete_entities(&args.names)?;
    output(&graph, flags.format)
}
