//! Enumerations and field types for studio management.
//!
//! This module defines the structured data types used to categorise tasks,
//! clients, products, deliveries and ledger entries, including the display
//! labels observed in the product (pt-BR).

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Content formats a task can produce.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TaskKind {
    Feed,
    Carousel,
    Stories,
    Adaptation,
}

/// Task delivery status. Set explicitly by the operator; the system never
/// derives it from the due date (a task dated in the future can be marked
/// late, and the classifier honours that).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Done,
    Producing,
    Awaiting,
    Late,
}

/// Task priority classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Normal,
    High,
    Critical,
}

/// Commercial relationship a client has with the studio.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ClientKind {
    Agency,
    FinalClient,
}

/// Client account health.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ClientStatus {
    Active,
    Inactive,
    Warning,
}

/// Catalogue entry formats, a superset of [`TaskKind`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ProductKind {
    Feed,
    Carousel,
    Stories,
    Identity,
    Adaptation,
    Other,
}

/// Where a delivery sits in the approval flow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryStatus {
    Sent,
    Awaiting,
    Approved,
    InRevision,
}

/// Payment status of a ledger entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentStatus {
    Paid,
    Receivable,
}

/// Filtering options for tasks based on due dates.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DueFilter {
    Today,
    ThisWeek,
    Overdue,
    None,
}

/// Available sorting options for task lists.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortKey {
    Due,
    Priority,
    Id,
}

/// Format a task kind for display.
pub fn format_task_kind(k: TaskKind) -> &'static str {
    match k {
        TaskKind::Feed => "Feed",
        TaskKind::Carousel => "Carrossel",
        TaskKind::Stories => "Stories",
        TaskKind::Adaptation => "Adaptação",
    }
}

/// Format a task status for display.
pub fn format_task_status(s: TaskStatus) -> &'static str {
    match s {
        TaskStatus::Done => "Concluído",
        TaskStatus::Producing => "Em produção",
        TaskStatus::Awaiting => "Aguardando aprovação",
        TaskStatus::Late => "Atrasado",
    }
}

/// Format a priority for display.
pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::Normal => "Normal",
        Priority::High => "Alta",
        Priority::Critical => "Crítica",
    }
}

/// Format a client kind for display.
pub fn format_client_kind(k: ClientKind) -> &'static str {
    match k {
        ClientKind::Agency => "Agência",
        ClientKind::FinalClient => "Cliente Final",
    }
}

/// Format a client status for display.
pub fn format_client_status(s: ClientStatus) -> &'static str {
    match s {
        ClientStatus::Active => "Ativo",
        ClientStatus::Inactive => "Inativo",
        ClientStatus::Warning => "Atenção",
    }
}

/// Format a product kind for display.
pub fn format_product_kind(k: ProductKind) -> &'static str {
    match k {
        ProductKind::Feed => "Feed",
        ProductKind::Carousel => "Carrossel",
        ProductKind::Stories => "Stories",
        ProductKind::Identity => "Identidade",
        ProductKind::Adaptation => "Adaptação",
        ProductKind::Other => "Outro",
    }
}

/// Format a delivery status for display.
pub fn format_delivery_status(s: DeliveryStatus) -> &'static str {
    match s {
        DeliveryStatus::Sent => "Enviado",
        DeliveryStatus::Awaiting => "Aguardando",
        DeliveryStatus::Approved => "Aprovado",
        DeliveryStatus::InRevision => "Em Ajuste",
    }
}

/// Format a payment status for display.
pub fn format_payment_status(s: PaymentStatus) -> &'static str {
    match s {
        PaymentStatus::Paid => "Pago",
        PaymentStatus::Receivable => "A Receber",
    }
}
