//! Fleet and customer summaries derived from the ledger.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::core::model::{Asset, Rental};
use crate::core::status::{self, RentalState};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FleetSummary {
    pub total_assets: usize,
    pub available: usize,
    pub rented: usize,
    pub overdue: usize,
    /// Sum of asset quantities.
    pub total_units: u64,
    /// Share of assets out on rent (rented or overdue), 0-100.
    pub utilization_pct: f64,
}

pub fn fleet_summary(assets: &[Asset], rentals: &[Rental], now: DateTime<Utc>) -> FleetSummary {
    let mut summary = FleetSummary {
        total_assets: assets.len(),
        ..Default::default()
    };

    for asset in assets {
        summary.total_units += u64::from(asset.quantity);
        match status::derive_status(asset, rentals, now).status {
            RentalState::Available => summary.available += 1,
            RentalState::Rented => summary.rented += 1,
            RentalState::Overdue => summary.overdue += 1,
        }
    }

    if summary.total_assets > 0 {
        let out = (summary.rented + summary.overdue) as f64;
        summary.utilization_pct = out / summary.total_assets as f64 * 100.0;
    }
    summary
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRecord {
    pub name: String,
    pub total_rentals: usize,
    pub late_returns: usize,
    pub currently_overdue: usize,
    /// On-time rentals as a percentage of all rentals.
    pub reliability_pct: f64,
}

/// One record per customer name, least reliable first.
pub fn customer_records(rentals: &[Rental], now: DateTime<Utc>) -> Vec<CustomerRecord> {
    let mut by_name: BTreeMap<&str, (usize, usize, usize)> = BTreeMap::new();
    for rental in rentals {
        let entry = by_name.entry(rental.customer.name.as_str()).or_default();
        entry.0 += 1;
        if status::late_days(rental) > 0 {
            entry.1 += 1;
        }
        if status::is_overdue(rental, now) {
            entry.2 += 1;
        }
    }

    let mut records: Vec<CustomerRecord> = by_name
        .into_iter()
        .map(|(name, (total, late, overdue))| {
            let on_time = total - late - overdue;
            CustomerRecord {
                name: name.to_string(),
                total_rentals: total,
                late_returns: late,
                currently_overdue: overdue,
                reliability_pct: if total == 0 {
                    100.0
                } else {
                    on_time as f64 / total as f64 * 100.0
                },
            }
        })
        .collect();

    records.sort_by(|a, b| {
        a.reliability_pct
            .total_cmp(&b.reliability_pct)
            .then_with(|| a.name.cmp(&b.name))
    });
    records
}
