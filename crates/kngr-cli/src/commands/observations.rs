use kngr_core::requests::{ObservationDeletion, ObservationInput};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::PayloadArgs;
use crate::commands::shared::payload::load_records;
use crate::context::AppContext;
use crate::output::output;

/// Handle `kngr add-observations`.
pub fn add(args: &PayloadArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let inputs: Vec<ObservationInput> = load_records(&args.payload, "observations")?;
    let mut store = ctx.open_store();
    let results = store.add_observations(&inputs)?;
    output(&results, flags.format)
}

/// Handle `kngr delete-observations`.
pub fn delete(args: &PayloadArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let deletions: Vec<ObservationDeletion> = load_records(&args.payload, "deletions")?;
    let mut store = ctx.open_store();
    let graph = store.delete_observations(&deletions)?;
    output(&graph, flags.format)
}
