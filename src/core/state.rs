//! # Application State
//!
//! Core business state for Rentrack. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── ledger: Ledger                      // assets + rentals, owns the store
//! ├── route: Route                        // current view
//! ├── status_message: String              // status bar text
//! ├── error: Option<String>               // user-visible failure
//! ├── form_issues: Option<ValidationError> // per-field messages for the open form
//! ├── default_site: String                // pre-fill for forms
//! ├── default_rental_days: u32
//! └── date_format: String
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! Views never cache ledger data; they rebuild it from `ledger` each frame.

use crate::core::config::ResolvedConfig;
use crate::core::form::ValidationError;
use crate::core::ledger::Ledger;
use crate::core::route::Route;

pub struct App {
    pub ledger: Ledger,
    pub route: Route,
    pub status_message: String,
    pub error: Option<String>,
    pub form_issues: Option<ValidationError>,
    pub default_site: String,
    pub default_rental_days: u32,
    pub date_format: String,
}

impl App {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger,
            route: Route::Dashboard,
            status_message: String::from("Welcome to Rentrack!"),
            error: None,
            form_issues: None,
            default_site: crate::core::config::DEFAULT_SITE.to_string(),
            default_rental_days: crate::core::config::DEFAULT_RENTAL_DAYS,
            date_format: crate::core::config::DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    pub fn from_config(ledger: Ledger, config: &ResolvedConfig) -> Self {
        Self {
            default_site: config.default_site.clone(),
            default_rental_days: config.default_rental_days,
            date_format: config.date_format.clone(),
            ..Self::new(ledger)
        }
    }
}
