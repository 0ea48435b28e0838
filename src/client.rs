//! Client registry, product catalogue, deliveries and the finance ledger.
//!
//! These records are independent of the task/timer core; tasks reference
//! clients by free-text name only.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fields::{ClientKind, ClientStatus, DeliveryStatus, PaymentStatus, ProductKind};

/// A client account with its monthly commercial limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub kind: ClientKind,
    /// Monthly spending limit agreed with the client, in BRL.
    pub limit: f64,
    /// Running balance against the limit, in BRL. May go negative.
    pub balance: f64,
    pub status: ClientStatus,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub notes: Option<String>,
}

/// Caller-supplied fields for client creation; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewClient {
    pub name: String,
    pub kind: ClientKind,
    pub limit: f64,
    pub balance: f64,
    pub status: ClientStatus,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub notes: Option<String>,
}

/// A catalogue entry with default pricing and turnaround.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub kind: ProductKind,
    pub description: String,
    pub default_price: f64,
    /// Turnaround in days.
    pub delivery_time: u32,
    pub notes: Option<String>,
}

/// Per-client pricing override for a catalogue product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientProduct {
    pub client_id: String,
    pub product_id: String,
    pub custom_price: f64,
    pub is_active: bool,
}

/// A delivery sent to a client for approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
    pub id: String,
    pub client: String,
    pub title: String,
    pub date: NaiveDate,
    pub status: DeliveryStatus,
    pub files: Vec<String>,
}

/// One line of the finance ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceEntry {
    pub date: NaiveDate,
    pub client: String,
    /// Billing category label ("Pacote", "Urgência", "Identidade", ...).
    pub kind: String,
    pub description: String,
    pub value: f64,
    pub status: PaymentStatus,
}
