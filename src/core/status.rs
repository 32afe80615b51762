//! # Rental State Deriver
//!
//! Every view asks this module whether an asset is available, rented, or
//! overdue. Nothing here reads the clock or the store: callers pass `now`
//! and the rental list, so the same inputs always give the same answer.
//!
//! ```text
//! returned_at == None && now >  check_in_at   →  Overdue
//! returned_at == None && now <= check_in_at   →  Rented
//! no active rental                            →  Available
//! returned_at >  check_in_at                  →  returned late
//! ```

use chrono::{DateTime, Duration, Utc};

use crate::core::model::{Asset, Rental};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Availability of an asset at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RentalState {
    Available,
    Rented,
    Overdue,
}

impl RentalState {
    pub fn label(&self) -> &'static str {
        match self {
            RentalState::Available => "Available",
            RentalState::Rented => "Rented",
            RentalState::Overdue => "Overdue",
        }
    }
}

/// How far past due an overdue rental is, by hours late.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Classify by time past the expected return: 72h+ critical, 24h+ high,
    /// 4h+ medium, anything less low.
    pub fn from_overdue(overdue: Duration) -> Self {
        let hours = overdue.num_hours();
        if hours >= 72 {
            Severity::Critical
        } else if hours >= 24 {
            Severity::High
        } else if hours >= 4 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// Derived view of one asset's rental situation.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedStatus<'a> {
    pub status: RentalState,
    pub active_rental: Option<&'a Rental>,
    pub is_overdue: bool,
    /// Whole days past the expected return, rounded up. 0 unless overdue.
    pub overdue_days: i64,
    /// Whole days late on the asset's most recent return, rounded up.
    /// 0 if it came back on time or has never been returned.
    pub late_days: i64,
    pub severity: Option<Severity>,
}

/// Where a single rental stands at `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RentalStanding {
    Active,
    Overdue { days: i64 },
    Returned,
    ReturnedLate { days: i64 },
}

impl RentalStanding {
    pub fn label(&self) -> String {
        match self {
            RentalStanding::Active => "Active".to_string(),
            RentalStanding::Overdue { days } => format!("Overdue {}d", days),
            RentalStanding::Returned => "Returned".to_string(),
            RentalStanding::ReturnedLate { days } => format!("Returned {}d late", days),
        }
    }
}

/// Ceiling of `span` in whole days. Non-positive spans give 0.
fn ceil_days(span: Duration) -> i64 {
    let secs = span.num_seconds();
    if secs <= 0 {
        return 0;
    }
    (secs + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
}

/// The rental for `asset_id` with no return time, if any.
pub fn active_rental<'a>(asset_id: &str, rentals: &'a [Rental]) -> Option<&'a Rental> {
    rentals
        .iter()
        .find(|r| r.asset_id == asset_id && r.returned_at.is_none())
}

pub fn is_overdue(rental: &Rental, now: DateTime<Utc>) -> bool {
    rental.returned_at.is_none() && now > rental.check_in_at
}

/// Days past due for an active rental, rounded up; 0 if not overdue.
pub fn overdue_days(rental: &Rental, now: DateTime<Utc>) -> i64 {
    if !is_overdue(rental, now) {
        return 0;
    }
    ceil_days(now - rental.check_in_at)
}

/// Days late on a completed rental, rounded up; 0 if active or on time.
pub fn late_days(rental: &Rental) -> i64 {
    match rental.returned_at {
        Some(returned_at) if returned_at > rental.check_in_at => {
            ceil_days(returned_at - rental.check_in_at)
        }
        _ => 0,
    }
}

pub fn rental_standing(rental: &Rental, now: DateTime<Utc>) -> RentalStanding {
    match rental.returned_at {
        None if now > rental.check_in_at => RentalStanding::Overdue {
            days: overdue_days(rental, now),
        },
        None => RentalStanding::Active,
        Some(_) => match late_days(rental) {
            0 => RentalStanding::Returned,
            days => RentalStanding::ReturnedLate { days },
        },
    }
}

/// Derive the rental state of `asset` from the rental list at `now`.
pub fn derive_status<'a>(
    asset: &Asset,
    rentals: &'a [Rental],
    now: DateTime<Utc>,
) -> DerivedStatus<'a> {
    let active = active_rental(&asset.id, rentals);
    let is_overdue = active.is_some_and(|r| now > r.check_in_at);

    let status = match active {
        Some(_) if is_overdue => RentalState::Overdue,
        Some(_) => RentalState::Rented,
        None => RentalState::Available,
    };

    let (overdue_days, severity) = match active {
        Some(r) if is_overdue => (
            ceil_days(now - r.check_in_at),
            Some(Severity::from_overdue(now - r.check_in_at)),
        ),
        _ => (0, None),
    };

    let late_days = rentals
        .iter()
        .filter(|r| r.asset_id == asset.id)
        .filter_map(|r| r.returned_at.map(|at| (at, r)))
        .max_by_key(|(at, _)| *at)
        .map(|(_, r)| late_days(r))
        .unwrap_or(0);

    DerivedStatus {
        status,
        active_rental: active,
        is_overdue,
        overdue_days,
        late_days,
        severity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{AssetStatus, Customer};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 10, 12, 0, 0).unwrap()
    }

    fn asset(id: &str) -> Asset {
        Asset {
            id: id.to_string(),
            name: "Scissor Lift".to_string(),
            category: "Access".to_string(),
            site: "Yard".to_string(),
            status: AssetStatus::Idle,
            last_seen_at: now(),
            quantity: 1,
            description: String::new(),
            image_emoji: String::new(),
        }
    }

    fn rental(asset_id: &str, due: DateTime<Utc>, returned: Option<DateTime<Utc>>) -> Rental {
        Rental {
            id: format!("R-{}", due.timestamp()),
            asset_id: asset_id.to_string(),
            site: "Yard".to_string(),
            check_out_at: due - Duration::days(5),
            check_in_at: due,
            customer: Customer::default(),
            fuel_at_start: None,
            odometer_at_start: None,
            notes: String::new(),
            created_at: due - Duration::days(5),
            returned_at: returned,
        }
    }

    #[test]
    fn test_available_without_rentals() {
        let derived = derive_status(&asset("A"), &[], now());
        assert_eq!(derived.status, RentalState::Available);
        assert!(derived.active_rental.is_none());
        assert!(!derived.is_overdue);
        assert_eq!(derived.overdue_days, 0);
        assert_eq!(derived.late_days, 0);
    }

    #[test]
    fn test_rented_before_due() {
        let rentals = vec![rental("A", now() + Duration::hours(1), None)];
        let derived = derive_status(&asset("A"), &rentals, now());
        assert_eq!(derived.status, RentalState::Rented);
        assert!(!derived.is_overdue);
        assert_eq!(derived.active_rental.map(|r| r.id.as_str()), Some(rentals[0].id.as_str()));
    }

    #[test]
    fn test_exactly_at_due_time_is_not_overdue() {
        let rentals = vec![rental("A", now(), None)];
        let derived = derive_status(&asset("A"), &rentals, now());
        assert_eq!(derived.status, RentalState::Rented);
        assert_eq!(derived.overdue_days, 0);
    }

    #[test]
    fn test_overdue_three_days() {
        let rentals = vec![rental("A", now() - Duration::days(3), None)];
        let derived = derive_status(&asset("A"), &rentals, now());
        assert_eq!(derived.status, RentalState::Overdue);
        assert!(derived.is_overdue);
        assert_eq!(derived.overdue_days, 3);
        assert_eq!(derived.severity, Some(Severity::Critical));
    }

    #[test]
    fn test_overdue_days_round_up() {
        let r = rental("A", now() - Duration::hours(25), None);
        assert_eq!(overdue_days(&r, now()), 2);
        let r = rental("A", now() - Duration::minutes(1), None);
        assert_eq!(overdue_days(&r, now()), 1);
    }

    #[test]
    fn test_returned_rental_never_overdue() {
        let due = now() - Duration::days(10);
        let rentals = vec![rental("A", due, Some(due + Duration::days(2)))];
        for offset in [0, 5, 500] {
            let at = now() + Duration::days(offset);
            let derived = derive_status(&asset("A"), &rentals, at);
            assert!(!derived.is_overdue);
            assert_eq!(derived.status, RentalState::Available);
            assert!(!is_overdue(&rentals[0], at));
        }
    }

    #[test]
    fn test_late_days_from_most_recent_return() {
        let early_due = now() - Duration::days(20);
        let late_due = now() - Duration::days(10);
        let rentals = vec![
            rental("A", late_due, Some(late_due + Duration::hours(30))),
            rental("A", early_due, Some(early_due - Duration::hours(1))),
        ];
        let derived = derive_status(&asset("A"), &rentals, now());
        assert_eq!(derived.late_days, 2);
    }

    #[test]
    fn test_other_assets_rentals_ignored() {
        let rentals = vec![rental("B", now() - Duration::days(1), None)];
        let derived = derive_status(&asset("A"), &rentals, now());
        assert_eq!(derived.status, RentalState::Available);
    }

    #[test]
    fn test_rental_standing_labels() {
        let due = now() - Duration::days(2);
        assert_eq!(
            rental_standing(&rental("A", due, None), now()),
            RentalStanding::Overdue { days: 2 }
        );
        assert_eq!(
            rental_standing(&rental("A", now() + Duration::days(1), None), now()),
            RentalStanding::Active
        );
        assert_eq!(
            rental_standing(&rental("A", due, Some(due)), now()),
            RentalStanding::Returned
        );
        let late = rental_standing(&rental("A", due, Some(due + Duration::hours(2))), now());
        assert_eq!(late, RentalStanding::ReturnedLate { days: 1 });
        assert_eq!(late.label(), "Returned 1d late");
    }

    #[test]
    fn test_severity_thresholds() {
        assert_eq!(Severity::from_overdue(Duration::hours(3)), Severity::Low);
        assert_eq!(Severity::from_overdue(Duration::hours(4)), Severity::Medium);
        assert_eq!(Severity::from_overdue(Duration::hours(24)), Severity::High);
        assert_eq!(Severity::from_overdue(Duration::hours(72)), Severity::Critical);
    }
}
