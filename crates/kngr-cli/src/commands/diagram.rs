use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `kngr diagram`.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut store = ctx.open_store();
    let report = store
        .regenerate_diagram()
        .context("failed to write diagram")?;
    output(&report, flags.format)
}
