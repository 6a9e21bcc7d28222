use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `kngr where`.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&ctx.location(), flags.format)
}
