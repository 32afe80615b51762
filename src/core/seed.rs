//! Demo data written to an empty ledger.
//!
//! Timestamps are relative to the seed time so the demo always shows one
//! overdue rental (due 3 days ago), one on-time return and one late return.

use chrono::{DateTime, Duration, Utc};

use crate::core::model::{Asset, AssetStatus, Customer, Rental};

/// id, name, category, site, quantity, emoji, description
type DemoAsset = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    u32,
    &'static str,
    &'static str,
);

const DEMO_ASSETS: [DemoAsset; 6] = [
    (
        "EQ-001",
        "Mini Excavator 3.5t",
        "Earthmoving",
        "Main Yard",
        1,
        "🚜",
        "Zero-tail swing, rubber tracks",
    ),
    (
        "EQ-002",
        "Scissor Lift 26ft",
        "Access",
        "Main Yard",
        2,
        "🏗️",
        "Electric, non-marking tires",
    ),
    (
        "EQ-003",
        "Generator 20kVA",
        "Power",
        "Riverside Depot",
        1,
        "⚡",
        "Diesel, sound-attenuated",
    ),
    (
        "EQ-004",
        "Plate Compactor",
        "Compaction",
        "Main Yard",
        3,
        "🧱",
        "Forward plate, 90kg",
    ),
    (
        "EQ-005",
        "Pressure Washer",
        "Cleaning",
        "Riverside Depot",
        2,
        "💦",
        "3000 psi, hot water",
    ),
    (
        "EQ-006",
        "Light Tower",
        "Power",
        "Main Yard",
        1,
        "💡",
        "4x LED, towable",
    ),
];

/// Build the demo assets and rentals as of `now`.
pub fn demo_ledger(now: DateTime<Utc>) -> (Vec<Asset>, Vec<Rental>) {
    let mut assets: Vec<Asset> = DEMO_ASSETS
        .iter()
        .map(|&(id, name, category, site, quantity, emoji, description)| Asset {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            site: site.to_string(),
            status: AssetStatus::Idle,
            last_seen_at: now - Duration::hours(6),
            quantity,
            description: description.to_string(),
            image_emoji: emoji.to_string(),
        })
        .collect();

    let customer = |name: &str, phone: &str, email: &str| Customer {
        name: name.to_string(),
        phone: phone.to_string(),
        email: email.to_string(),
    };

    let rentals = vec![
        Rental {
            id: "R-1001".to_string(),
            asset_id: "EQ-003".to_string(),
            site: "Harbor St. Build".to_string(),
            check_out_at: now - Duration::days(14),
            check_in_at: now - Duration::days(10),
            customer: customer("Priya Raman", "555-0142", "priya@example.com"),
            fuel_at_start: Some(100),
            odometer_at_start: None,
            notes: "Returned clean".to_string(),
            created_at: now - Duration::days(14),
            returned_at: Some(now - Duration::days(10) - Duration::hours(2)),
        },
        Rental {
            id: "R-1002".to_string(),
            asset_id: "EQ-002".to_string(),
            site: "Elm Ave. Offices".to_string(),
            check_out_at: now - Duration::days(9),
            check_in_at: now - Duration::days(6),
            customer: customer("Marcus Bell", "555-0178", ""),
            fuel_at_start: None,
            odometer_at_start: None,
            notes: String::new(),
            created_at: now - Duration::days(9),
            returned_at: Some(now - Duration::days(4) - Duration::hours(3)),
        },
        Rental {
            id: "R-1003".to_string(),
            asset_id: "EQ-001".to_string(),
            site: "Oakridge Subdivision".to_string(),
            check_out_at: now - Duration::days(7),
            check_in_at: now - Duration::days(3),
            customer: customer("Dana Ortiz", "555-0119", "dana@ortizbuild.example"),
            fuel_at_start: Some(90),
            odometer_at_start: Some(1240),
            notes: "Bucket teeth replaced before dispatch".to_string(),
            created_at: now - Duration::days(7),
            returned_at: None,
        },
    ];

    for rental in &rentals {
        if let Some(a) = assets.iter_mut().find(|a| a.id == rental.asset_id) {
            a.last_seen_at = rental.returned_at.unwrap_or(rental.check_out_at);
            if rental.is_active() {
                a.status = AssetStatus::Rented;
                a.site = rental.site.clone();
            }
        }
    }

    (assets, rentals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::status::{RentalState, derive_status};
    use chrono::TimeZone;

    #[test]
    fn test_demo_has_exactly_one_overdue_active_rental() {
        let now = Utc.with_ymd_and_hms(2026, 1, 20, 8, 0, 0).unwrap();
        let (assets, rentals) = demo_ledger(now);
        assert!(!assets.is_empty());
        assert!(!rentals.is_empty());

        let active: Vec<_> = rentals.iter().filter(|r| r.is_active()).collect();
        assert_eq!(active.len(), 1);
        assert!(active[0].check_in_at < now);

        let rented = assets.iter().find(|a| a.id == active[0].asset_id).unwrap();
        assert_eq!(rented.status, AssetStatus::Rented);
        let derived = derive_status(rented, &rentals, now);
        assert_eq!(derived.status, RentalState::Overdue);
        assert_eq!(derived.overdue_days, 3);
    }

    #[test]
    fn test_demo_rentals_reference_known_assets() {
        let (assets, rentals) = demo_ledger(Utc::now());
        for rental in &rentals {
            assert!(assets.iter().any(|a| a.id == rental.asset_id));
        }
    }
}
