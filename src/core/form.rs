//! # Form Validation
//!
//! Raw text from the rental form and the add-equipment overlay is collected
//! into drafts. `validate` either produces a record ready for the ledger or a
//! [`ValidationError`] listing every field that needs fixing.

use std::fmt;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::core::model::{self, Asset, AssetStatus, Customer, Rental};

/// Emoji used when the add-equipment form leaves it blank.
pub const DEFAULT_ASSET_EMOJI: &str = "📦";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    CustomerName,
    Phone,
    Email,
    Site,
    ExpectedReturn,
    FuelAtStart,
    OdometerAtStart,
    Notes,
    Name,
    Category,
    Quantity,
    Description,
    Emoji,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            FormField::CustomerName => "Customer name",
            FormField::Phone => "Phone",
            FormField::Email => "Email",
            FormField::Site => "Site",
            FormField::ExpectedReturn => "Expected return",
            FormField::FuelAtStart => "Fuel at start (%)",
            FormField::OdometerAtStart => "Odometer at start",
            FormField::Notes => "Notes",
            FormField::Name => "Name",
            FormField::Category => "Category",
            FormField::Quantity => "Quantity",
            FormField::Description => "Description",
            FormField::Emoji => "Emoji",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: FormField,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn issue_for(&self, field: FormField) -> Option<&str> {
        self.issues
            .iter()
            .find(|i| i.field == field)
            .map(|i| i.message.as_str())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .issues
            .iter()
            .map(|i| format!("{}: {}", i.field.label(), i.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// Collects issues while a draft is checked field by field.
#[derive(Default)]
struct Issues(Vec<FieldIssue>);

impl Issues {
    fn push(&mut self, field: FormField, message: impl Into<String>) {
        self.0.push(FieldIssue {
            field,
            message: message.into(),
        });
    }

    fn required(&mut self, field: FormField, value: &str) -> String {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.push(field, "required");
        }
        trimmed.to_string()
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationError> {
        if self.0.is_empty() {
            Ok(value())
        } else {
            Err(ValidationError { issues: self.0 })
        }
    }
}

// ============================================================================
// Rental form
// ============================================================================

/// Raw rental-form input. Every field is the text as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RentalDraft {
    pub asset_id: String,
    pub customer_name: String,
    pub phone: String,
    pub email: String,
    pub site: String,
    pub expected_return: String,
    pub fuel_at_start: String,
    pub odometer_at_start: String,
    pub notes: String,
}

impl RentalDraft {
    /// Check every field and build a rental checked out at `now`.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<Rental, ValidationError> {
        let mut issues = Issues::default();

        let name = issues.required(FormField::CustomerName, &self.customer_name);
        let phone = issues.required(FormField::Phone, &self.phone);
        let site = issues.required(FormField::Site, &self.site);

        let email = self.email.trim().to_string();
        if !email.is_empty() && !email.contains('@') {
            issues.push(FormField::Email, "must contain @");
        }

        let check_in_at = match parse_return_time(&self.expected_return, now) {
            Ok(at) if at <= now => {
                issues.push(FormField::ExpectedReturn, "must be after check-out");
                None
            }
            Ok(at) => Some(at),
            Err(message) => {
                issues.push(FormField::ExpectedReturn, message);
                None
            }
        };

        let fuel_at_start = match parse_optional::<u8>(&self.fuel_at_start) {
            Ok(Some(pct)) if pct > 100 => {
                issues.push(FormField::FuelAtStart, "must be 0-100");
                None
            }
            Ok(value) => value,
            Err(()) => {
                issues.push(FormField::FuelAtStart, "must be 0-100");
                None
            }
        };

        let odometer_at_start = parse_optional::<u32>(&self.odometer_at_start).unwrap_or_else(|()| {
            issues.push(FormField::OdometerAtStart, "must be a whole number");
            None
        });

        issues.finish(|| Rental {
            id: model::new_rental_id(),
            asset_id: self.asset_id.clone(),
            site,
            check_out_at: now,
            check_in_at: check_in_at.unwrap_or(now),
            customer: Customer { name, phone, email },
            fuel_at_start,
            odometer_at_start,
            notes: self.notes.trim().to_string(),
            created_at: now,
            returned_at: None,
        })
    }
}

// ============================================================================
// Add-equipment form
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetDraft {
    pub name: String,
    pub category: String,
    pub site: String,
    pub quantity: String,
    pub description: String,
    pub emoji: String,
}

impl AssetDraft {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<Asset, ValidationError> {
        let mut issues = Issues::default();

        let name = issues.required(FormField::Name, &self.name);
        let category = issues.required(FormField::Category, &self.category);
        let site = issues.required(FormField::Site, &self.site);

        let quantity = match parse_optional::<u32>(&self.quantity) {
            Ok(None) => 1,
            Ok(Some(q)) if q > 0 => q,
            _ => {
                issues.push(FormField::Quantity, "must be a positive whole number");
                1
            }
        };

        let emoji = match self.emoji.trim() {
            "" => DEFAULT_ASSET_EMOJI.to_string(),
            e => e.to_string(),
        };

        issues.finish(|| Asset {
            id: model::new_asset_id(),
            name,
            category,
            site,
            status: AssetStatus::Idle,
            last_seen_at: now,
            quantity,
            description: self.description.trim().to_string(),
            image_emoji: emoji,
        })
    }
}

// ============================================================================
// Parsing
// ============================================================================

fn parse_optional<T: std::str::FromStr>(raw: &str) -> Result<Option<T>, ()> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed.parse().map(Some).map_err(|_| ())
}

/// Parse an expected-return entry.
///
/// Accepts `+3d` / `+12h` relative to `now`, or an absolute local time as
/// `YYYY-MM-DD HH:MM` or `YYYY-MM-DD` (end of business, 17:00).
pub fn parse_return_time(raw: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, String> {
    let input = raw.trim();
    if input.is_empty() {
        return Err("required".to_string());
    }

    if let Some(rest) = input.strip_prefix('+') {
        let unit_start = rest.char_indices().last().map_or(0, |(i, _)| i);
        let (amount, unit) = rest.split_at(unit_start);
        let amount: i64 = amount
            .parse()
            .map_err(|_| format!("can't read {input:?}; try +3d or +12h"))?;
        let span = match unit {
            "d" | "D" => Duration::try_days(amount),
            "h" | "H" => Duration::try_hours(amount),
            _ => return Err(format!("unknown unit in {input:?}; use d or h")),
        };
        return span
            .and_then(|span| now.checked_add_signed(span))
            .ok_or_else(|| "too far in the future".to_string());
    }

    let naive = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M")
        .or_else(|_| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d").map(|d| {
                d.and_time(NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN))
            })
        })
        .map_err(|_| format!("can't read {input:?}; use YYYY-MM-DD HH:MM"))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| format!("{input} does not exist in local time"))
}

/// Default text for the expected-return field.
pub fn default_return_input(days: u32) -> String {
    format!("+{days}d")
}
