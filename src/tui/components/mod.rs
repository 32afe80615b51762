//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as parameters:
//! - `TitleBar`: Top status bar showing route, status and storage warnings
//!
//! ### Stateful Components (Persistent State + Transient Wrapper)
//!
//! A `*State` struct lives in `TuiState` and survives frames (selection,
//! typed text, focus). A borrowing wrapper is built every frame with the
//! view model it should draw:
//! - `Dashboard` / `DashboardState`: equipment table with fleet summary
//! - `RentalForm` / `RentalFormState`: check-out form for one asset
//! - `History` / `HistoryState`: rental log with customer reliability
//! - `AssetForm` / `AssetFormState`: add-equipment overlay
//!
//! `TextField` and `FormFields` are the building blocks of both forms.
//!
//! ### Props-Based Data Flow
//!
//! Components receive external data as "props", never by reading the ledger
//! themselves. View models come from `core::view`, rebuilt every frame.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── dashboard.rs     (#/)
//! ├── rental_form.rs   (#/rent/<id>)
//! ├── history.rs       (#/history)
//! ├── asset_form.rs    (Add-equipment overlay)
//! ├── form_fields.rs   (Focusable field stack)
//! └── text_field.rs    (Single-line input)
//! ```

use chrono::{DateTime, Local, Utc};

mod title_bar;
pub use title_bar::TitleBar;

pub mod asset_form;
pub mod dashboard;
pub mod form_fields;
pub mod history;
pub mod rental_form;
pub mod text_field;
pub use asset_form::{AssetForm, AssetFormState};
pub use dashboard::{Dashboard, DashboardEvent, DashboardState};
pub use form_fields::FormEvent;
pub use history::{History, HistoryEvent, HistoryState};
pub use rental_form::{RentalForm, RentalFormState};

/// Format a UTC timestamp in local time with a strftime pattern.
pub fn format_local(at: DateTime<Utc>, pattern: &str) -> String {
    at.with_timezone(&Local).format(pattern).to_string()
}
