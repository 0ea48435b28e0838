use clap::Parser;

use crate::cmd::Commands;

/// Studio management dashboard for a solo design operation.
/// All data lives in memory for the session; use `export` for reporting.
#[derive(Parser)]
#[command(name = "sm", version, about = "Painel de gestão do estúdio")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}
