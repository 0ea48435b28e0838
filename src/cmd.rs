//! Command implementations for the CLI interface.
//!
//! This module contains the command handlers behind every subcommand, from
//! listing and inspecting tasks to the month agenda, the ledger summary and
//! the TUI entry point.

use clap::Subcommand;
use clap_complete::{generate, Shell};

use std::fs;

use chrono::{Duration, Local, NaiveDate};

use crate::client::NewClient;
use crate::db::*;
use crate::deadline::*;
use crate::fields::*;
use crate::task::{NewTask, Task, TaskPatch};
use crate::tui::router::View;
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive dashboard.
    Ui {
        /// Initial route: /dashboard | /tarefas | /cadastros | /entregas | /financeiro.
        #[arg(long)]
        route: Option<String>,
    },

    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Client name.
        #[arg(long)]
        client: String,
        /// Due date: YYYY-MM-DD, "hoje", "amanhã" or "em Nd".
        #[arg(long, default_value = "hoje")]
        due: String,
        /// Content format: feed | carousel | stories | adaptation.
        #[arg(long, value_enum, default_value_t = TaskKind::Feed)]
        kind: TaskKind,
        /// Delivery status: done | producing | awaiting | late.
        #[arg(long, value_enum, default_value_t = TaskStatus::Producing)]
        status: TaskStatus,
        /// Priority: normal | high | critical.
        #[arg(long, value_enum, default_value_t = Priority::Normal)]
        priority: Priority,
        /// Free-form notes.
        #[arg(long)]
        notes: Option<String>,
    },

    /// List tasks with optional filters.
    List {
        /// Include completed tasks.
        #[arg(long)]
        all: bool,
        /// Filter by status.
        #[arg(long, value_enum)]
        status: Option<TaskStatus>,
        /// Filter by content format.
        #[arg(long, value_enum)]
        kind: Option<TaskKind>,
        /// Filter by client name (case-insensitive).
        #[arg(long)]
        client: Option<String>,
        /// Due filter: today | this-week | overdue | none.
        #[arg(long, value_enum)]
        due: Option<DueFilter>,
        /// Sort key.
        #[arg(long, value_enum, default_value_t = SortKey::Due)]
        sort: SortKey,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// View a single task by ID or title.
    View {
        /// Task ID or title to view.
        id: String,
    },

    /// Mark a task done.
    Complete {
        /// Task ID to complete.
        id: String,
    },

    /// Print the month agenda with per-day demand summaries.
    Agenda {
        /// Year (defaults to the current year).
        #[arg(long)]
        year: Option<i32>,
        /// Month 1-12 (defaults to the current month).
        #[arg(long)]
        month: Option<u32>,
    },

    /// List registered clients and the product catalogue.
    Clients,

    /// Register a new client.
    ClientAdd {
        /// Client name (must be unique).
        name: String,
        /// Relationship: agency | final-client.
        #[arg(long, value_enum, default_value_t = ClientKind::FinalClient)]
        kind: ClientKind,
        /// Monthly limit in BRL.
        #[arg(long, default_value_t = 500.0)]
        limit: f64,
        /// Contact e-mail.
        #[arg(long)]
        email: Option<String>,
        /// Contact phone.
        #[arg(long)]
        phone: Option<String>,
        /// WhatsApp number.
        #[arg(long)]
        whatsapp: Option<String>,
        /// Free-form notes.
        #[arg(long)]
        notes: Option<String>,
    },

    /// List deliveries and their approval state.
    Deliveries,

    /// Print the ledger with month totals.
    Finance,

    /// Export a JSON snapshot of the session data.
    Export {
        /// Output file. Prints to stdout when omitted.
        #[arg(long)]
        output: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the terminal user interface, optionally at a named route.
pub fn cmd_ui(store: Store, route: Option<String>) {
    let initial = match route.as_deref() {
        Some(r) => match View::from_route(r) {
            Some(view) => view,
            None => {
                eprintln!("Rota desconhecida: {}", r);
                std::process::exit(1);
            }
        },
        None => View::Dashboard,
    };
    if let Err(e) = run_tui(store, initial) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Add a new task to the store.
#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    store: &mut Store,
    title: String,
    client: String,
    due: String,
    kind: TaskKind,
    status: TaskStatus,
    priority: Priority,
    notes: Option<String>,
) {
    let today = Local::now().date_naive();
    let Some(due) = parse_due_input(&due, today) else {
        eprintln!("Data inválida: '{}'", due);
        std::process::exit(1);
    };
    let id = store.create_task(NewTask {
        title,
        client,
        due,
        kind,
        status,
        priority,
        notes,
    });
    let task = store.get_task(&id).map(|t| t.title.clone()).unwrap_or_default();
    println!("Criada tarefa {} — {}", id, task);
}

/// Apply the list filters to the store's tasks. Split out of [`cmd_list`]
/// so the filter semantics are testable without capturing stdout.
pub fn filter_tasks<'a>(
    store: &'a Store,
    today: NaiveDate,
    all: bool,
    status: Option<TaskStatus>,
    kind: Option<TaskKind>,
    client: Option<&str>,
    due: Option<DueFilter>,
) -> Vec<&'a Task> {
    let week_start = monday_of_week(today);
    let week_end = week_start + Duration::days(6);

    store
        .tasks
        .iter()
        .filter(|t| {
            if !all && status.is_none() && t.status == TaskStatus::Done {
                return false;
            }
            if let Some(s) = status {
                if t.status != s {
                    return false;
                }
            }
            if let Some(k) = kind {
                if t.kind != k {
                    return false;
                }
            }
            if let Some(c) = client {
                if !t.client.eq_ignore_ascii_case(c) {
                    return false;
                }
            }
            if let Some(df) = due {
                let delta = day_delta(t.due, today);
                match df {
                    DueFilter::Today => {
                        if delta != 0 {
                            return false;
                        }
                    }
                    DueFilter::ThisWeek => {
                        if t.due < week_start || t.due > week_end {
                            return false;
                        }
                    }
                    DueFilter::Overdue => {
                        if delta >= 0 {
                            return false;
                        }
                    }
                    DueFilter::None => {
                        // Every task carries a due date; nothing matches.
                        return false;
                    }
                }
            }
            true
        })
        .collect()
}

/// List tasks with optional filters.
#[allow(clippy::too_many_arguments)]
pub fn cmd_list(
    store: &Store,
    all: bool,
    status: Option<TaskStatus>,
    kind: Option<TaskKind>,
    client: Option<String>,
    due: Option<DueFilter>,
    sort: SortKey,
    limit: Option<usize>,
) {
    let today = Local::now().date_naive();
    let mut filtered = filter_tasks(store, today, all, status, kind, client.as_deref(), due);

    match sort {
        SortKey::Due => filtered.sort_by(|a, b| a.due.cmp(&b.due).then(a.id.cmp(&b.id))),
        SortKey::Priority => {
            let rank = |p: Priority| match p {
                Priority::Critical => 0,
                Priority::High => 1,
                Priority::Normal => 2,
            };
            filtered.sort_by(|a, b| {
                rank(a.priority)
                    .cmp(&rank(b.priority))
                    .then(a.due.cmp(&b.due))
                    .then(a.id.cmp(&b.id))
            });
        }
        SortKey::Id => filtered.sort_by(|a, b| a.id.cmp(&b.id)),
    }

    if let Some(n) = limit {
        filtered.truncate(n);
    }

    print_task_table(&filtered, today);
}

fn print_task_table(tasks: &[&Task], today: NaiveDate) {
    println!(
        "{:<6} {:<32} {:<20} {:<10} {:<10} {:<21} {}",
        "ID", "Título", "Cliente", "Tipo", "Prior.", "Status", "Prazo"
    );
    for t in tasks {
        println!(
            "{:<6} {:<32} {:<20} {:<10} {:<10} {:<21} {} ({})",
            t.id,
            truncate(&t.title, 32),
            truncate(&t.client, 20),
            format_task_kind(t.kind),
            format_priority(t.priority),
            format_task_status(t.status),
            t.due,
            urgency_label(day_delta(t.due, today)),
        );
    }
    println!("{} tarefa(s)", tasks.len());
}

/// View a single task by ID or title.
pub fn cmd_view(store: &Store, id: String) {
    let task = store
        .get_task(&id)
        .or_else(|| store.tasks.iter().find(|t| t.title.eq_ignore_ascii_case(&id)));
    let Some(task) = task else {
        eprintln!("Tarefa com ID {} não encontrada", id);
        std::process::exit(1);
    };
    let today = Local::now().date_naive();
    println!("ID:          {}", task.id);
    println!("Título:      {}", task.title);
    println!("Cliente:     {}", task.client);
    println!("Tipo:        {}", format_task_kind(task.kind));
    println!("Prioridade:  {}", format_priority(task.priority));
    println!("Status:      {}", format_task_status(task.status));
    println!(
        "Prazo:       {} ({})",
        format_date_short(task.due),
        urgency_label(day_delta(task.due, today))
    );
    println!(
        "Notas:       {}",
        task.notes.clone().unwrap_or_else(|| "-".into())
    );
}

/// Mark a task done.
pub fn cmd_complete(store: &mut Store, id: String) {
    let patch = TaskPatch {
        status: Some(TaskStatus::Done),
        ..Default::default()
    };
    match store.update_task(&id, patch) {
        Ok(()) => println!("Tarefa {} concluída", id),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Print the month agenda: the Sunday-first grid, then a summary line for
/// each day that has tasks.
pub fn cmd_agenda(store: &Store, year: Option<i32>, month: Option<u32>) {
    use chrono::Datelike;
    let today = Local::now().date_naive();
    let year = year.unwrap_or_else(|| today.year());
    let month = month.unwrap_or_else(|| today.month());

    let Some(grid) = MonthGrid::new(year, month) else {
        eprintln!("Mês inválido: {}", month);
        std::process::exit(1);
    };

    println!("{}", month_title(year, month));
    println!(
        "{}",
        WEEKDAY_HEADERS
            .iter()
            .map(|d| format!("{:>4}", d))
            .collect::<String>()
    );
    for week in grid.cells().chunks(7) {
        let mut line = String::new();
        for cell in week {
            match cell {
                None => line.push_str("    "),
                Some(day) => {
                    let date = grid.date_of(*day);
                    let busy = date
                        .map(|d| !tasks_for_day(&store.tasks, d).is_empty())
                        .unwrap_or(false);
                    let mark = if date == Some(today) {
                        '<'
                    } else if busy {
                        '*'
                    } else {
                        ' '
                    };
                    line.push_str(&format!("{:>3}{}", day, mark));
                }
            }
        }
        println!("{}", line.trim_end());
    }

    println!();
    for day in 1..=grid.days {
        let Some(date) = grid.date_of(day) else {
            continue;
        };
        let day_tasks = tasks_for_day(&store.tasks, date);
        if let Some(summary) = day_summary(&day_tasks) {
            println!("{}  {}", date_key(date), summary);
        }
    }

    let upcoming = upcoming_within(&store.tasks, today, 7, false);
    if !upcoming.is_empty() {
        println!();
        println!("Próximas entregas (7 dias):");
        for t in upcoming {
            println!(
                "  {}  {} ({}) — {}",
                t.id,
                truncate(&t.title, 32),
                truncate(&t.client, 20),
                urgency_label(day_delta(t.due, today)),
            );
        }
    }
}

/// List registered clients and the product catalogue.
pub fn cmd_clients(store: &Store) {
    println!(
        "{:<5} {:<20} {:<14} {:>12} {:>12} {:<8} {}",
        "ID", "Nome", "Tipo", "Limite", "Saldo", "Status", "E-mail"
    );
    for c in &store.clients {
        println!(
            "{:<5} {:<20} {:<14} {:>12} {:>12} {:<8} {}",
            c.id,
            truncate(&c.name, 20),
            format_client_kind(c.kind),
            format_brl(c.limit),
            format_brl(c.balance),
            format_client_status(c.status),
            c.email.clone().unwrap_or_else(|| "-".into()),
        );
    }
    println!();
    println!(
        "{:<5} {:<24} {:<12} {:>12} {}",
        "ID", "Produto", "Tipo", "Preço", "Prazo (dias)"
    );
    for p in &store.products {
        println!(
            "{:<5} {:<24} {:<12} {:>12} {}",
            p.id,
            truncate(&p.name, 24),
            format_product_kind(p.kind),
            format_brl(p.default_price),
            p.delivery_time,
        );
    }
}

/// Register a new client, rejecting duplicate names.
#[allow(clippy::too_many_arguments)]
pub fn cmd_client_add(
    store: &mut Store,
    name: String,
    kind: ClientKind,
    limit: f64,
    email: Option<String>,
    phone: Option<String>,
    whatsapp: Option<String>,
    notes: Option<String>,
) {
    if store.client_by_name(&name).is_some() {
        eprintln!("Cliente já cadastrado: {}", name);
        std::process::exit(1);
    }
    let id = store.create_client(NewClient {
        name: name.clone(),
        kind,
        limit,
        balance: 0.0,
        status: ClientStatus::Active,
        email,
        phone,
        whatsapp,
        notes,
    });
    println!("Criado cliente {} — {}", id, name);
}

/// List deliveries and their approval state.
pub fn cmd_deliveries(store: &Store) {
    println!(
        "{:<5} {:<20} {:<26} {:<12} {:<11} {}",
        "ID", "Cliente", "Título", "Data", "Status", "Arquivos"
    );
    for d in &store.deliveries {
        println!(
            "{:<5} {:<20} {:<26} {:<12} {:<11} {}",
            d.id,
            truncate(&d.client, 20),
            truncate(&d.title, 26),
            format_date_short(d.date),
            format_delivery_status(d.status),
            d.files.join(", "),
        );
    }
}

/// Print the ledger with month totals.
pub fn cmd_finance(store: &Store) {
    let today = Local::now().date_naive();
    println!(
        "{:<12} {:<20} {:<12} {:<24} {:>12} {}",
        "Data", "Cliente", "Tipo", "Descrição", "Valor", "Status"
    );
    for e in &store.finance {
        println!(
            "{:<12} {:<20} {:<12} {:<24} {:>12} {}",
            format_date_short(e.date),
            truncate(&e.client, 20),
            truncate(&e.kind, 12),
            truncate(&e.description, 24),
            format_brl(e.value),
            format_payment_status(e.status),
        );
    }
    let (billed, received, receivable) = store.month_totals(today);
    println!();
    println!("Faturado no mês: {}", format_brl(billed));
    println!("Recebido:        {}", format_brl(received));
    println!("A receber:       {}", format_brl(receivable));
}

/// Export a JSON snapshot of the session data.
pub fn cmd_export(store: &Store, output: Option<String>) {
    let snapshot = store.snapshot();
    let json = match serde_json::to_string_pretty(&snapshot) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Falha ao serializar: {e}");
            std::process::exit(1);
        }
    };
    match output {
        Some(path) => {
            if let Err(e) = fs::write(&path, json) {
                eprintln!("Falha ao escrever {}: {}", path, e);
                std::process::exit(1);
            }
            println!("Exportado para {}", path);
        }
        None => println!("{}", json),
    }
}

/// Generate shell completions.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;

    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 22).unwrap()
    }

    #[test]
    fn test_filter_hides_done_by_default() {
        let mut store = Store::seeded(today());
        store
            .update_task(
                "T-101",
                TaskPatch {
                    status: Some(TaskStatus::Done),
                    ..Default::default()
                },
            )
            .unwrap();
        let visible = filter_tasks(&store, today(), false, None, None, None, None);
        assert!(visible.iter().all(|t| t.id != "T-101"));
        let all = filter_tasks(&store, today(), true, None, None, None, None);
        assert!(all.iter().any(|t| t.id == "T-101"));
    }

    #[test]
    fn test_filter_due_today() {
        let store = Store::seeded(today());
        let due_today =
            filter_tasks(&store, today(), false, None, None, None, Some(DueFilter::Today));
        assert_eq!(due_today.len(), 2);
        assert!(due_today.iter().all(|t| t.due == today()));
    }

    #[test]
    fn test_filter_by_client_is_case_insensitive() {
        let store = Store::seeded(today());
        let tasks = filter_tasks(&store, today(), false, None, None, Some("techstartup"), None);
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn test_filter_status_overrides_done_hiding() {
        let mut store = Store::seeded(today());
        store
            .update_task(
                "T-101",
                TaskPatch {
                    status: Some(TaskStatus::Done),
                    ..Default::default()
                },
            )
            .unwrap();
        let done = filter_tasks(
            &store,
            today(),
            false,
            Some(TaskStatus::Done),
            None,
            None,
            None,
        );
        assert_eq!(done.len(), 1);
    }
}
