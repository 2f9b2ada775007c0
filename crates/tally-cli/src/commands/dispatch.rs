use tally_config::TallyConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(command: Commands, config: &TallyConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Extract(args) => commands::extract::handle(&args, config, flags),
        Commands::Batch(args) => commands::batch::handle(&args, config, flags),
        Commands::Roster { action } => commands::roster::handle(&action, flags),
        Commands::Patterns(args) => commands::patterns::handle(&args, config, flags),
        Commands::Schema(args) => commands::schema::handle(&args, flags),
    }
}
