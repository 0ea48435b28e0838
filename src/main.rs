//! # SM - Studio Management CLI
//!
//! A command-line dashboard for a solo design studio: production agenda,
//! client registry, delivery tracking, a finance ledger and a focus timer,
//! with an optional terminal user interface (TUI).
//!
//! ## Key Features
//!
//! - **Production Agenda**: Sunday-first month calendar with per-day demand
//!   summaries ("3 demandas — 2 feeds, 1 carrossel")
//! - **Deadline Alerts**: tasks classified into urgent / upcoming /
//!   within-deadline buckets; a manually flagged late task always alerts,
//!   whatever its date says
//! - **Focus Timer**: session, day and week counters against a 4-hour daily
//!   goal, optionally bound to one task
//! - **Registries**: clients, product catalogue, per-client pricing,
//!   deliveries and a month ledger
//! - **Session Storage**: everything lives in memory, seeded with the
//!   studio's sample dataset; `export` writes a JSON snapshot
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the dashboard
//! sm ui
//!
//! # Add a task via CLI
//! sm add "Carrossel institucional" --client "Silva & Associados" --due "em 3d" --kind carousel
//!
//! # List tasks due this week
//! sm list --due this-week
//!
//! # Month agenda
//! sm agenda
//!
//! # Ledger with month totals
//! sm finance
//! ```

use clap::Parser;
use chrono::Local;

pub mod cli;
pub mod client;
pub mod cmd;
pub mod db;
pub mod deadline;
pub mod fields;
pub mod task;
pub mod timer;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod router;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use db::Store;

fn main() {
    let cli = Cli::parse();
    let mut store = Store::seeded(Local::now().date_naive());

    match cli.command {
        Commands::Ui { route } => cmd_ui(store, route),
        Commands::Add {
            title,
            client,
            due,
            kind,
            status,
            priority,
            notes,
        } => cmd_add(&mut store, title, client, due, kind, status, priority, notes),
        Commands::List {
            all,
            status,
            kind,
            client,
            due,
            sort,
            limit,
        } => cmd_list(&store, all, status, kind, client, due, sort, limit),
        Commands::View { id } => cmd_view(&store, id),
        Commands::Complete { id } => cmd_complete(&mut store, id),
        Commands::Agenda { year, month } => cmd_agenda(&store, year, month),
        Commands::Clients => cmd_clients(&store),
        Commands::ClientAdd {
            name,
            kind,
            limit,
            email,
            phone,
            whatsapp,
            notes,
        } => cmd_client_add(&mut store, name, kind, limit, email, phone, whatsapp, notes),
        Commands::Deliveries => cmd_deliveries(&store),
        Commands::Finance => cmd_finance(&store),
        Commands::Export { output } => cmd_export(&store, output),
        Commands::Completions { shell } => cmd_completions(shell),
    }
}
