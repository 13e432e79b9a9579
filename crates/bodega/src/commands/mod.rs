//! Command dispatch: bridges CLI args -> actions -> output formatting.

pub mod auth;
pub mod categories;
pub mod config_cmd;
pub mod dashboard;
pub mod inventory;
pub mod products;
pub mod profile;
pub mod sales;
pub mod users;
pub mod util;

use clap::CommandFactory;
use clap_complete::generate;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::config::Context;
use crate::error::CliError;

/// Dispatch any command. Only API-bound commands open a session.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Config(args) => config_cmd::handle(args, global),
        Command::Completions(args) => {
            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "bodega", &mut std::io::stdout());
            Ok(())
        }
        cmd => dispatch_api(cmd, global).await,
    }
}

async fn dispatch_api(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    let ctx = Context::open(global)?;
    tracing::debug!(command = ?cmd, profile = %ctx.profile_name, "dispatching command");

    match cmd {
        Command::Login { email } => auth::login(&ctx, email, global).await,
        Command::Logout => auth::logout(&ctx, global),
        Command::Whoami => auth::whoami(&ctx, global),
        Command::Register(fields) => auth::register(&ctx, fields, global).await,
        Command::Dashboard => dashboard::handle(&ctx, global).await,
        Command::Categories(args) => categories::handle(&ctx, args, global).await,
        Command::Products(args) => products::handle(&ctx, args, global).await,
        Command::Users(args) => users::handle(&ctx, args, global).await,
        Command::Sales(args) => sales::handle(&ctx, args, global).await,
        Command::Inventory(args) => inventory::handle(&ctx, args, global).await,
        Command::Profile(args) => profile::handle(&ctx, args, global).await,
        // Handled in `dispatch` without a session
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
