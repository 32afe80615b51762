//! # View Models
//!
//! Plain data for each route, rebuilt from the ledger on every render so no
//! view ever shows state the ledger doesn't hold.

use chrono::{DateTime, Utc};

use crate::core::ledger::Ledger;
use crate::core::model::{Asset, Rental};
use crate::core::report::{self, CustomerRecord, FleetSummary};
use crate::core::status::{self, RentalStanding, RentalState, Severity};

#[derive(Debug, Clone, PartialEq)]
pub struct AssetRow {
    pub asset: Asset,
    pub state: RentalState,
    pub overdue_days: i64,
    pub severity: Option<Severity>,
    pub customer: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
}

impl AssetRow {
    pub fn status_label(&self) -> String {
        match self.state {
            RentalState::Overdue => format!("Overdue {}d", self.overdue_days),
            state => state.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub rows: Vec<AssetRow>,
    pub summary: FleetSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub rental: Rental,
    pub asset_label: String,
    pub standing: RentalStanding,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryView {
    pub rows: Vec<HistoryRow>,
    pub customers: Vec<CustomerRecord>,
}

pub fn dashboard(ledger: &Ledger, now: DateTime<Utc>) -> DashboardView {
    let rentals = ledger.list_rentals();
    let rows = ledger
        .list_assets()
        .iter()
        .map(|asset| {
            let derived = status::derive_status(asset, rentals, now);
            AssetRow {
                asset: asset.clone(),
                state: derived.status,
                overdue_days: derived.overdue_days,
                severity: derived.severity,
                customer: derived.active_rental.map(|r| r.customer.name.clone()),
                due_at: derived.active_rental.map(|r| r.check_in_at),
            }
        })
        .collect();

    DashboardView {
        rows,
        summary: report::fleet_summary(ledger.list_assets(), rentals, now),
    }
}

/// Every rental, most recent check-out first.
pub fn history(ledger: &Ledger, now: DateTime<Utc>) -> HistoryView {
    let mut rows: Vec<HistoryRow> = ledger
        .list_rentals()
        .iter()
        .map(|rental| HistoryRow {
            asset_label: ledger
                .asset(&rental.asset_id)
                .map(|a| format!("{} {}", a.image_emoji, a.name))
                .unwrap_or_else(|| rental.asset_id.clone()),
            standing: status::rental_standing(rental, now),
            rental: rental.clone(),
        })
        .collect();
    rows.sort_by(|a, b| b.rental.check_out_at.cmp(&a.rental.check_out_at));

    HistoryView {
        rows,
        customers: report::customer_records(ledger.list_rentals(), now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_dashboard_marks_overdue_row() {
        let ledger = Ledger::in_memory(now());
        let view = dashboard(&ledger, now());
        assert_eq!(view.rows.len(), ledger.list_assets().len());

        let overdue: Vec<_> = view
            .rows
            .iter()
            .filter(|r| r.state == RentalState::Overdue)
            .collect();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].status_label(), "Overdue 3d");
        assert_eq!(overdue[0].customer.as_deref(), Some("Dana Ortiz"));
        assert_eq!(view.summary.overdue, 1);
    }

    #[test]
    fn test_dashboard_reflects_check_in_immediately() {
        let mut ledger = Ledger::in_memory(now());
        ledger.check_in("EQ-001", now()).unwrap();
        let view = dashboard(&ledger, now());
        assert!(view.rows.iter().all(|r| r.state == RentalState::Available));
    }

    #[test]
    fn test_history_newest_first_with_standings() {
        let ledger = Ledger::in_memory(now());
        let view = history(&ledger, now());
        assert_eq!(view.rows.len(), 3);
        assert!(view.rows[0].rental.check_out_at >= view.rows[1].rental.check_out_at);
        assert_eq!(view.rows[0].standing, RentalStanding::Overdue { days: 3 });
        assert!(view.rows[0].asset_label.contains("Mini Excavator"));
        assert!(matches!(view.rows[1].standing, RentalStanding::ReturnedLate { .. }));
        assert_eq!(view.rows[2].standing, RentalStanding::Returned);
    }
}
