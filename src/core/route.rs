//! # Routes
//!
//! The three views, addressable by fragment-style paths:
//!
//! | Route                  | Fragment            |
//! |------------------------|---------------------|
//! | `Dashboard`            | `#/`                |
//! | `RentalForm{asset_id}` | `#/rent/<asset_id>` |
//! | `History`              | `#/history`         |
//!
//! Anything unrecognized resolves to the dashboard.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Dashboard,
    RentalForm { asset_id: String },
    History,
}

impl Route {
    /// Parse a fragment path. Leading `#` and `/` are optional.
    pub fn parse(fragment: &str) -> Self {
        let path = fragment.trim();
        let path = path.strip_prefix('#').unwrap_or(path);
        let path = path.trim_matches('/');

        let mut parts = path.splitn(2, '/');
        match (parts.next(), parts.next()) {
            (Some("history"), None) => Route::History,
            (Some("rent"), Some(asset_id)) if !asset_id.is_empty() && !asset_id.contains('/') => {
                Route::RentalForm {
                    asset_id: asset_id.to_string(),
                }
            }
            _ => Route::Dashboard,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::RentalForm { .. } => "Rental Form",
            Route::History => "History",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Dashboard => write!(f, "#/"),
            Route::RentalForm { asset_id } => write!(f, "#/rent/{asset_id}"),
            Route::History => write!(f, "#/history"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_routes() {
        assert_eq!(Route::parse("#/"), Route::Dashboard);
        assert_eq!(Route::parse(""), Route::Dashboard);
        assert_eq!(Route::parse("#/history"), Route::History);
        assert_eq!(Route::parse("history/"), Route::History);
        assert_eq!(
            Route::parse("#/rent/EQ-004"),
            Route::RentalForm {
                asset_id: "EQ-004".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_routes_fall_back_to_dashboard() {
        assert_eq!(Route::parse("#/settings"), Route::Dashboard);
        assert_eq!(Route::parse("#/rent"), Route::Dashboard);
        assert_eq!(Route::parse("#/rent/"), Route::Dashboard);
        assert_eq!(Route::parse("#/rent/a/b"), Route::Dashboard);
        assert_eq!(Route::parse("#/history/extra"), Route::Dashboard);
    }

    #[test]
    fn test_display_parses_back() {
        for route in [
            Route::Dashboard,
            Route::History,
            Route::RentalForm {
                asset_id: "EQ-001".to_string(),
            },
        ] {
            assert_eq!(Route::parse(&route.to_string()), route);
        }
    }
}
