use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(command: &Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::CreateEntities(args) => commands::entities::create(args, ctx, flags),
        Commands::CreateRelations(args) => commands::relations::create(args, ctx, flags),
        Commands::AddObservations(args) => commands::observations::add(args, ctx, flags),
        Commands::DeleteEntities(args) => commands::entities::delete(args, ctx, flags),
        Commands::DeleteObservations(args) => commands::observations::delete(args, ctx, flags),
        Commands::DeleteRelations(args) => commands::relations::delete(args, ctx, flags),
        Commands::ReadGraph => commands::read::read_graph(ctx, flags),
        Commands::SearchNodes(args) => commands::read::search(args, ctx, flags),
        Commands::OpenNodes(args) => commands::read::open(args, ctx, flags),
        Commands::Diagram => commands::diagram::handle(ctx, flags),
        Commands::Classify(args) => commands::classify::handle(args, ctx, flags),
        Commands::Where => commands::locate::handle(ctx, flags),
    }
}
