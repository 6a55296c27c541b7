use clap::Parser;
use team_todo::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => cli::serve::run().await,
        Command::Migrate(args) => cli::migrate::run(args).await,
        Command::DeleteUser(args) => cli::delete_user::run(args).await,
    }
}
