//! # Ledger Records
//!
//! The two record types the ledger persists: `Asset` (a piece of rentable
//! equipment) and `Rental` (one check-out/check-in cycle for an asset).
//!
//! Field names are camelCase on disk so the JSON matches the contract a
//! backend would expose for the same shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cached rental state of an asset. `Rented` iff some rental referencing the
/// asset has no `returned_at`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    #[default]
    Idle,
    Rented,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub category: String,
    pub site: String,
    pub status: AssetStatus,
    pub last_seen_at: DateTime<Utc>,
    pub quantity: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_emoji: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Customer {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    pub id: String,
    pub asset_id: String,
    pub site: String,
    pub check_out_at: DateTime<Utc>,
    /// Expected return time. Never overwritten on check-in.
    pub check_in_at: DateTime<Utc>,
    pub customer: Customer,
    #[serde(default)]
    pub fuel_at_start: Option<u8>,
    #[serde(default)]
    pub odometer_at_start: Option<u32>,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    /// Actual return time, set once on check-in.
    #[serde(default)]
    pub returned_at: Option<DateTime<Utc>>,
}

impl Rental {
    /// True while the rental has no recorded return time.
    pub fn is_active(&self) -> bool {
        self.returned_at.is_none()
    }
}

/// Generate a new asset ID (`EQ-` plus 8 hex chars).
pub fn new_asset_id() -> String {
    format!("EQ-{}", short_uuid())
}

/// Generate a new rental ID (`R-` plus 8 hex chars).
pub fn new_rental_id() -> String {
    format!("R-{}", short_uuid())
}

fn short_uuid() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id.to_uppercase()
}
