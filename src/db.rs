//! In-memory store for the studio session.
//!
//! All collections live in one `Store` owned by the caller (main or the TUI
//! app) and passed by reference; there are no module-level globals. Nothing
//! is persisted between sessions: the store is seeded with the studio's
//! sample dataset at startup, re-based onto today's date so the calendar
//! and the deadline classifier always have live material. The `export`
//! command can serialise a snapshot to JSON for reporting.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::client::{Client, ClientProduct, Delivery, FinanceEntry, NewClient, Product};
use crate::fields::*;
use crate::task::{NewTask, Task, TaskPatch};

/// Session store owning every collection of the dashboard.
#[derive(Debug, Default)]
pub struct Store {
    pub tasks: Vec<Task>,
    pub clients: Vec<Client>,
    pub products: Vec<Product>,
    pub client_products: Vec<ClientProduct>,
    pub deliveries: Vec<Delivery>,
    pub finance: Vec<FinanceEntry>,
}

/// Serialisable view of the store for the `export` command.
#[derive(Serialize)]
pub struct Snapshot<'a> {
    pub tasks: &'a [Task],
    pub clients: &'a [Client],
    pub products: &'a [Product],
    pub client_products: &'a [ClientProduct],
    pub deliveries: &'a [Delivery],
    pub finance: &'a [FinanceEntry],
}

impl Store {
    /// Empty store. Mostly useful in tests.
    pub fn new() -> Self {
        Store::default()
    }

    /// Next task id: monotonic "T-NNN" seeded from the highest existing
    /// numeric suffix, so ids stay unique for the session.
    pub fn next_task_id(&self) -> String {
        let max = self
            .tasks
            .iter()
            .filter_map(|t| t.id.strip_prefix("T-")?.parse::<u64>().ok())
            .max()
            .unwrap_or(100);
        format!("T-{}", max + 1)
    }

    /// Next client id, "C-NN".
    pub fn next_client_id(&self) -> String {
        let max = self
            .clients
            .iter()
            .filter_map(|c| c.id.strip_prefix("C-")?.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        format!("C-{:02}", max + 1)
    }

    /// Get a task by id.
    pub fn get_task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Get a mutable reference to a task by id.
    pub fn get_task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Create a task from caller-supplied fields, assigning the id here.
    /// Returns the id of the new task.
    pub fn create_task(&mut self, fields: NewTask) -> String {
        let id = self.next_task_id();
        self.tasks.push(Task {
            id: id.clone(),
            title: fields.title,
            client: fields.client,
            due: fields.due,
            kind: fields.kind,
            status: fields.status,
            priority: fields.priority,
            notes: fields.notes,
        });
        id
    }

    /// Apply a partial update to a task. Unknown ids are reported rather
    /// than silently ignored.
    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> Result<(), String> {
        match self.get_task_mut(id) {
            Some(task) => {
                task.apply(patch);
                Ok(())
            }
            None => Err(format!("Tarefa com ID {} não encontrada", id)),
        }
    }

    /// Create a client, assigning the id here. Returns the new id.
    pub fn create_client(&mut self, fields: NewClient) -> String {
        let id = self.next_client_id();
        self.clients.push(Client {
            id: id.clone(),
            name: fields.name,
            kind: fields.kind,
            limit: fields.limit,
            balance: fields.balance,
            status: fields.status,
            email: fields.email,
            phone: fields.phone,
            whatsapp: fields.whatsapp,
            notes: fields.notes,
        });
        id
    }

    /// Case-insensitive client lookup by name.
    pub fn client_by_name(&self, name: &str) -> Option<&Client> {
        self.clients
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Snapshot for serialisation.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            tasks: &self.tasks,
            clients: &self.clients,
            products: &self.products,
            client_products: &self.client_products,
            deliveries: &self.deliveries,
            finance: &self.finance,
        }
    }

    /// Month ledger totals: (billed, received, receivable) for the month
    /// containing `today`.
    pub fn month_totals(&self, today: NaiveDate) -> (f64, f64, f64) {
        let in_month = |d: NaiveDate| d.year() == today.year() && d.month() == today.month();
        let mut billed = 0.0;
        let mut received = 0.0;
        let mut receivable = 0.0;
        for entry in self.finance.iter().filter(|e| in_month(e.date)) {
            billed += entry.value;
            match entry.status {
                PaymentStatus::Paid => received += entry.value,
                PaymentStatus::Receivable => receivable += entry.value,
            }
        }
        (billed, received, receivable)
    }

    /// Count of clients currently active.
    pub fn active_clients(&self) -> usize {
        self.clients
            .iter()
            .filter(|c| c.status == ClientStatus::Active)
            .count()
    }

    /// The studio's sample dataset, re-based so "today" falls where the
    /// original dataset put its reference date. Day offsets mirror the
    /// original spread; T-103 is deliberately future-dated yet flagged
    /// late, exercising the status-over-date precedence.
    pub fn seeded(today: NaiveDate) -> Self {
        let d = |offset: i64| today + Duration::days(offset);
        let mut store = Store::new();

        store.tasks = vec![
            Task {
                id: "T-101".into(),
                title: "Carrossel Lançamento - v2".into(),
                client: "TechStartup".into(),
                due: d(0),
                kind: TaskKind::Carousel,
                status: TaskStatus::Producing,
                priority: Priority::High,
                notes: None,
            },
            Task {
                id: "T-102".into(),
                title: "Feed jurídico - revisão".into(),
                client: "Silva & Associados".into(),
                due: d(0),
                kind: TaskKind::Feed,
                status: TaskStatus::Awaiting,
                priority: Priority::Normal,
                notes: None,
            },
            Task {
                id: "T-103".into(),
                title: "Stories pacote - ajustes".into(),
                client: "AS Eventos".into(),
                due: d(1),
                kind: TaskKind::Stories,
                status: TaskStatus::Late,
                priority: Priority::Critical,
                notes: None,
            },
            Task {
                id: "T-104".into(),
                title: "Adaptação Feed→Story".into(),
                client: "TechStartup".into(),
                due: d(3),
                kind: TaskKind::Adaptation,
                status: TaskStatus::Producing,
                priority: Priority::Normal,
                notes: None,
            },
            Task {
                id: "T-105".into(),
                title: "Feed promocional".into(),
                client: "Pedro Costa".into(),
                due: d(6),
                kind: TaskKind::Feed,
                status: TaskStatus::Producing,
                priority: Priority::Normal,
                notes: None,
            },
            Task {
                id: "T-106".into(),
                title: "Carrossel institucional".into(),
                client: "Silva & Associados".into(),
                due: d(8),
                kind: TaskKind::Carousel,
                status: TaskStatus::Producing,
                priority: Priority::High,
                notes: None,
            },
        ];

        store.clients = vec![
            Client {
                id: "C-01".into(),
                name: "TechStartup".into(),
                kind: ClientKind::Agency,
                limit: 1200.0,
                balance: 900.0,
                status: ClientStatus::Active,
                email: Some("contato@techstartup.com".into()),
                phone: Some("(11) 98765-4321".into()),
                whatsapp: Some("(11) 98765-4321".into()),
                notes: Some("Agência focada em startups de tecnologia".into()),
            },
            Client {
                id: "C-02".into(),
                name: "Silva & Associados".into(),
                kind: ClientKind::FinalClient,
                limit: 800.0,
                balance: 620.0,
                status: ClientStatus::Active,
                email: Some("silva@advocacia.com".into()),
                phone: Some("(11) 3456-7890".into()),
                whatsapp: None,
                notes: None,
            },
            Client {
                id: "C-03".into(),
                name: "AS Eventos".into(),
                kind: ClientKind::Agency,
                limit: 1000.0,
                balance: -120.0,
                status: ClientStatus::Warning,
                email: Some("contato@aseventos.com".into()),
                phone: Some("(11) 99887-6655".into()),
                whatsapp: Some("(11) 99887-6655".into()),
                notes: None,
            },
            Client {
                id: "C-04".into(),
                name: "Pedro Costa".into(),
                kind: ClientKind::FinalClient,
                limit: 500.0,
                balance: 350.0,
                status: ClientStatus::Active,
                email: Some("pedro@costa.com".into()),
                phone: Some("(11) 91234-5678".into()),
                whatsapp: None,
                notes: None,
            },
        ];

        store.products = vec![
            Product {
                id: "P-01".into(),
                name: "Feed Estático".into(),
                kind: ProductKind::Feed,
                description: "Post único para feed do Instagram".into(),
                default_price: 20.0,
                delivery_time: 1,
                notes: None,
            },
            Product {
                id: "P-02".into(),
                name: "Carrossel".into(),
                kind: ProductKind::Carousel,
                description: "Post carrossel com até 10 slides".into(),
                default_price: 40.0,
                delivery_time: 2,
                notes: None,
            },
            Product {
                id: "P-03".into(),
                name: "Story".into(),
                kind: ProductKind::Stories,
                description: "Story único para Instagram".into(),
                default_price: 10.0,
                delivery_time: 1,
                notes: None,
            },
            Product {
                id: "P-04".into(),
                name: "Adaptação Feed→Story".into(),
                kind: ProductKind::Adaptation,
                description: "Adaptação de feed para story".into(),
                default_price: 12.0,
                delivery_time: 1,
                notes: None,
            },
            Product {
                id: "P-05".into(),
                name: "Identidade Visual".into(),
                kind: ProductKind::Identity,
                description: "Pacote completo de identidade visual".into(),
                default_price: 549.9,
                delivery_time: 7,
                notes: None,
            },
        ];

        store.client_products = vec![
            ClientProduct {
                client_id: "C-01".into(),
                product_id: "P-01".into(),
                custom_price: 18.0,
                is_active: true,
            },
            ClientProduct {
                client_id: "C-01".into(),
                product_id: "P-02".into(),
                custom_price: 35.0,
                is_active: true,
            },
            ClientProduct {
                client_id: "C-01".into(),
                product_id: "P-03".into(),
                custom_price: 10.0,
                is_active: true,
            },
            ClientProduct {
                client_id: "C-03".into(),
                product_id: "P-01".into(),
                custom_price: 22.0,
                is_active: true,
            },
            ClientProduct {
                client_id: "C-03".into(),
                product_id: "P-02".into(),
                custom_price: 40.0,
                is_active: true,
            },
        ];

        store.deliveries = vec![
            Delivery {
                id: "D-01".into(),
                client: "TechStartup".into(),
                title: "Carrossel Outubro".into(),
                date: d(-3),
                status: DeliveryStatus::Sent,
                files: vec!["v1.pdf".into()],
            },
            Delivery {
                id: "D-02".into(),
                client: "AS Eventos".into(),
                title: "Stories Lançamento".into(),
                date: d(-4),
                status: DeliveryStatus::InRevision,
                files: vec!["v1.png".into(), "v2.png".into()],
            },
            Delivery {
                id: "D-03".into(),
                client: "Pedro Costa".into(),
                title: "Feed Anúncio - Aprov.".into(),
                date: d(-7),
                status: DeliveryStatus::Approved,
                files: vec!["final.jpg".into()],
            },
            Delivery {
                id: "D-04".into(),
                client: "Silva & Associados".into(),
                title: "Feed Jurídico".into(),
                date: d(-2),
                status: DeliveryStatus::Awaiting,
                files: vec!["v1.jpg".into()],
            },
        ];

        store.finance = vec![
            FinanceEntry {
                date: d(-17),
                client: "Silva & Associados".into(),
                kind: "Pacote".into(),
                description: "Growth Mensal".into(),
                value: 924.0,
                status: PaymentStatus::Paid,
            },
            FinanceEntry {
                date: d(-16),
                client: "TechStartup".into(),
                kind: "Urgência".into(),
                description: "Entrega 12h úteis".into(),
                value: 150.0,
                status: PaymentStatus::Receivable,
            },
            FinanceEntry {
                date: d(-13),
                client: "Agência Digital".into(),
                kind: "Identidade".into(),
                description: "Intermediário".into(),
                value: 549.9,
                status: PaymentStatus::Paid,
            },
            FinanceEntry {
                date: d(-24),
                client: "Pedro Costa".into(),
                kind: "Pacote".into(),
                description: "Essential Mensal".into(),
                value: 450.0,
                status: PaymentStatus::Paid,
            },
            FinanceEntry {
                date: d(-10),
                client: "AS Eventos".into(),
                kind: "Urgência".into(),
                description: "Stories pacote".into(),
                value: 120.0,
                status: PaymentStatus::Receivable,
            },
        ];

        store
    }
}

/// Parse human-readable due date input.
///
/// Supports "hoje"/"today", "amanhã"/"tomorrow", "in Nd"/"em Nd" and the
/// ISO "YYYY-MM-DD" format.
pub fn parse_due_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();
    match s.as_str() {
        "hoje" | "today" => return Some(today),
        "amanhã" | "amanha" | "tomorrow" => return Some(today + Duration::days(1)),
        _ => {}
    }
    for prefix in ["in ", "em "] {
        if let Some(rest) = s.strip_prefix(prefix) {
            if let Some(nd) = rest.strip_suffix('d') {
                if let Ok(days) = nd.trim().parse::<i64>() {
                    return Some(today + Duration::days(days));
                }
            }
        }
    }
    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Format a monetary value the way the product shows it: "R$ 1.234,56".
pub fn format_brl(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;
    let mut digits = whole.to_string();
    let mut grouped = String::new();
    while digits.len() > 3 {
        let split = digits.len() - 3;
        grouped = format!(".{}{}", &digits[split..], grouped);
        digits.truncate(split);
    }
    grouped = format!("{}{}", digits, grouped);
    format!(
        "{}R$ {},{:02}",
        if negative { "-" } else { "" },
        grouped,
        frac
    )
}

/// Truncate a string to a maximum width, adding an ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 22).unwrap()
    }

    #[test]
    fn test_next_task_id_is_monotonic() {
        let mut store = Store::seeded(today());
        assert_eq!(store.next_task_id(), "T-107");
        let id = store.create_task(NewTask {
            title: "Nova".into(),
            client: "TechStartup".into(),
            due: today(),
            kind: TaskKind::Feed,
            status: TaskStatus::Producing,
            priority: Priority::Normal,
            notes: None,
        });
        assert_eq!(id, "T-107");
        assert_eq!(store.next_task_id(), "T-108");
    }

    #[test]
    fn test_update_task_patch_semantics() {
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
        let task = store.get_task("T-101").unwrap();
        assert_eq!(task.status, TaskStatus::Done);
        // Untouched fields survive the patch.
        assert_eq!(task.title, "Carrossel Lançamento - v2");
    }

    #[test]
    fn test_update_unknown_task_is_an_error() {
        let mut store = Store::seeded(today());
        let err = store
            .update_task("T-999", TaskPatch::default())
            .unwrap_err();
        assert!(err.contains("T-999"));
    }

    #[test]
    fn test_client_lookup_is_case_insensitive() {
        let store = Store::seeded(today());
        assert!(store.client_by_name("techstartup").is_some());
        assert!(store.client_by_name("desconhecido").is_none());
    }

    #[test]
    fn test_month_totals() {
        let store = Store::seeded(today());
        // All five seeded entries fall within the last 24 days; only the
        // ones inside the current calendar month count.
        let (billed, received, receivable) = store.month_totals(today());
        assert!(billed >= received + receivable - 1e-9);
        assert!(received > 0.0);
        assert!(receivable > 0.0);
    }

    #[test]
    fn test_parse_due_input() {
        let t = today();
        assert_eq!(parse_due_input("hoje", t), Some(t));
        assert_eq!(
            parse_due_input("amanhã", t),
            Some(t + Duration::days(1))
        );
        assert_eq!(parse_due_input("em 3d", t), Some(t + Duration::days(3)));
        assert_eq!(
            parse_due_input("2025-12-01", t),
            NaiveDate::from_ymd_opt(2025, 12, 1)
        );
        assert_eq!(parse_due_input("quarta que vem", t), None);
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(15000.0), "R$ 15.000,00");
        assert_eq!(format_brl(549.9), "R$ 549,90");
        assert_eq!(format_brl(-120.0), "-R$ 120,00");
        assert_eq!(format_brl(1234567.89), "R$ 1.234.567,89");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Silva & Associados", 10), "Silva & A…");
        assert_eq!(truncate("curto", 10), "curto");
    }
}
