//! # Actions
//!
//! Everything that can happen in Rentrack becomes an `Action`.
//! User presses Enter on an idle asset? That's `Action::Navigate(Route::RentalForm { .. })`.
//! User submits the form? That's `Action::SubmitRental { .. }`.
//!
//! The `update()` function takes the current state and an action, applies it,
//! and returns an `Effect` telling the adapter what else to do. Actions that
//! need the time carry it, so `update` never reads the clock.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::core::form::{AssetDraft, RentalDraft};
use crate::core::route::Route;
use crate::core::state::App;
use crate::core::status;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Navigate(Route),
    SubmitRental { draft: RentalDraft, now: DateTime<Utc> },
    CheckIn { asset_id: String, now: DateTime<Utc> },
    AddAsset { draft: AssetDraft, now: DateTime<Utc> },
    ResetDemo { now: DateTime<Utc> },
    DismissError,
    Quit,
}

/// Follow-up work for the adapter after `update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// The route changed; per-view presentation state should be rebuilt.
    RouteChanged,
    /// The add-equipment form succeeded and can be closed.
    AssetAdded,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::Navigate(route) => navigate(app, route),

        Action::SubmitRental { draft, now } => {
            let rental = match draft.validate(now) {
                Ok(rental) => rental,
                Err(issues) => {
                    app.status_message =
                        format!("Fix {} field(s) to continue", issues.issues.len());
                    app.form_issues = Some(issues);
                    return Effect::None;
                }
            };
            let asset_name = asset_name(app, &rental.asset_id);
            let customer = rental.customer.name.clone();
            match app.ledger.check_out(rental) {
                Ok(()) => {
                    app.error = None;
                    app.status_message = format!("Checked out {} to {}", asset_name, customer);
                }
                Err(e) => {
                    warn!("Check-out rejected: {}", e);
                    app.error = Some(e.to_string());
                }
            }
            app.form_issues = None;
            set_route(app, Route::Dashboard)
        }

        Action::CheckIn { asset_id, now } => {
            match app.ledger.check_in(&asset_id, now) {
                Ok(closed) => {
                    app.error = None;
                    let name = asset_name(app, &asset_id);
                    app.status_message = match status::late_days(&closed) {
                        0 => format!("Checked in {}", name),
                        days => format!("Checked in {} ({} day(s) late)", name, days),
                    };
                }
                Err(e) => {
                    warn!("Check-in rejected: {}", e);
                    app.error = Some(e.to_string());
                }
            }
            Effect::None
        }

        Action::AddAsset { draft, now } => match draft.validate(now) {
            Ok(asset) => {
                let name = asset.name.clone();
                match app.ledger.add_asset(asset) {
                    Ok(()) => {
                        app.error = None;
                        app.form_issues = None;
                        app.status_message = format!("Added {}", name);
                        Effect::AssetAdded
                    }
                    Err(e) => {
                        app.error = Some(e.to_string());
                        Effect::None
                    }
                }
            }
            Err(issues) => {
                app.status_message = format!("Fix {} field(s) to continue", issues.issues.len());
                app.form_issues = Some(issues);
                Effect::None
            }
        },

        Action::ResetDemo { now } => {
            app.ledger.reset_demo(now);
            app.error = None;
            app.status_message = "Demo data restored".to_string();
            set_route(app, Route::Dashboard)
        }

        Action::DismissError => {
            app.error = None;
            Effect::None
        }

        Action::Quit => Effect::Quit,
    }
}

/// Resolve a navigation request against the ledger. A rental form only opens
/// for an asset that exists and is not already out.
fn navigate(app: &mut App, route: Route) -> Effect {
    app.form_issues = None;
    let resolved = match route {
        Route::RentalForm { asset_id } => {
            if app.ledger.asset(&asset_id).is_none() {
                app.error = Some(format!("No asset with id {}", asset_id));
                Route::Dashboard
            } else if let Some(active) = app.ledger.active_rental(&asset_id) {
                app.error = Some(format!(
                    "{} is already rented to {}",
                    asset_name(app, &asset_id),
                    active.customer.name
                ));
                Route::Dashboard
            } else {
                app.error = None;
                Route::RentalForm { asset_id }
            }
        }
        other => {
            app.error = None;
            other
        }
    };
    set_route(app, resolved)
}

fn set_route(app: &mut App, route: Route) -> Effect {
    if app.route == route {
        return Effect::None;
    }
    info!("Route {} -> {}", app.route, route);
    app.route = route;
    Effect::RouteChanged
}

fn asset_name(app: &App, asset_id: &str) -> String {
    app.ledger
        .asset(asset_id)
        .map(|a| a.name.clone())
        .unwrap_or_else(|| asset_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::form::FormField;
    use crate::core::model::AssetStatus;
    use crate::test_support::{test_app, test_now};
    use chrono::Duration;

    fn draft_for(asset_id: &str) -> RentalDraft {
        RentalDraft {
            asset_id: asset_id.to_string(),
            customer_name: "Jo Park".to_string(),
            phone: "555-0133".to_string(),
            site: "Lot 9".to_string(),
            expected_return: "+2d".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_navigate_between_views() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Navigate(Route::History)), Effect::RouteChanged);
        assert_eq!(app.route, Route::History);
        assert_eq!(update(&mut app, Action::Navigate(Route::History)), Effect::None);
        assert_eq!(update(&mut app, Action::Navigate(Route::Dashboard)), Effect::RouteChanged);
    }

    #[test]
    fn test_rental_form_for_rented_asset_redirects() {
        let mut app = test_app();
        let effect = update(
            &mut app,
            Action::Navigate(Route::RentalForm {
                asset_id: "EQ-001".to_string(),
            }),
        );
        assert_eq!(effect, Effect::None);
        assert_eq!(app.route, Route::Dashboard);
        assert!(app.error.as_deref().unwrap().contains("already rented to Dana Ortiz"));
    }

    #[test]
    fn test_rental_form_for_unknown_asset_redirects() {
        let mut app = test_app();
        update(
            &mut app,
            Action::Navigate(Route::RentalForm {
                asset_id: "EQ-404".to_string(),
            }),
        );
        assert_eq!(app.route, Route::Dashboard);
        assert!(app.error.is_some());
    }

    #[test]
    fn test_submit_rental_checks_out_and_returns_to_dashboard() {
        let mut app = test_app();
        let form = Route::RentalForm {
            asset_id: "EQ-002".to_string(),
        };
        assert_eq!(update(&mut app, Action::Navigate(form)), Effect::RouteChanged);

        let effect = update(
            &mut app,
            Action::SubmitRental {
                draft: draft_for("EQ-002"),
                now: test_now(),
            },
        );
        assert_eq!(effect, Effect::RouteChanged);
        assert_eq!(app.route, Route::Dashboard);
        assert!(app.error.is_none());
        assert_eq!(app.status_message, "Checked out Scissor Lift 26ft to Jo Park");
        assert_eq!(app.ledger.asset("EQ-002").unwrap().status, AssetStatus::Rented);
    }

    #[test]
    fn test_invalid_submission_stays_on_form() {
        let mut app = test_app();
        let form = Route::RentalForm {
            asset_id: "EQ-002".to_string(),
        };
        update(&mut app, Action::Navigate(form.clone()));
        let draft = RentalDraft {
            customer_name: String::new(),
            ..draft_for("EQ-002")
        };
        let effect = update(&mut app, Action::SubmitRental { draft, now: test_now() });
        assert_eq!(effect, Effect::None);
        assert_eq!(app.route, form);
        let issues = app.form_issues.as_ref().unwrap();
        assert_eq!(issues.issue_for(FormField::CustomerName), Some("required"));
        assert_eq!(app.ledger.asset("EQ-002").unwrap().status, AssetStatus::Idle);
    }

    #[test]
    fn test_conflicting_submission_surfaces_error() {
        let mut app = test_app();
        let effect = update(
            &mut app,
            Action::SubmitRental {
                draft: draft_for("EQ-001"),
                now: test_now(),
            },
        );
        assert_eq!(effect, Effect::None);
        assert!(app.error.as_deref().unwrap().contains("already rented out"));
        let active = app
            .ledger
            .list_rentals()
            .iter()
            .filter(|r| r.asset_id == "EQ-001" && r.is_active())
            .count();
        assert_eq!(active, 1);
    }

    #[test]
    fn test_check_in_reports_lateness() {
        let mut app = test_app();
        let effect = update(
            &mut app,
            Action::CheckIn {
                asset_id: "EQ-001".to_string(),
                now: test_now() + Duration::hours(1),
            },
        );
        assert_eq!(effect, Effect::None);
        assert_eq!(app.status_message, "Checked in Mini Excavator 3.5t (4 day(s) late)");
    }

    #[test]
    fn test_check_in_idle_asset_is_error() {
        let mut app = test_app();
        update(
            &mut app,
            Action::CheckIn {
                asset_id: "EQ-004".to_string(),
                now: test_now(),
            },
        );
        assert!(app.error.as_deref().unwrap().contains("no active rental"));
        update(&mut app, Action::DismissError);
        assert!(app.error.is_none());
    }

    #[test]
    fn test_add_asset_flow() {
        let mut app = test_app();
        let bad = AssetDraft::default();
        let effect = update(
            &mut app,
            Action::AddAsset {
                draft: bad,
                now: test_now(),
            },
        );
        assert_eq!(effect, Effect::None);
        assert!(app.form_issues.is_some());

        let good = AssetDraft {
            name: "Skid Steer".to_string(),
            category: "Earthmoving".to_string(),
            site: "Main Yard".to_string(),
            ..Default::default()
        };
        let before = app.ledger.list_assets().len();
        assert_eq!(
            update(&mut app, Action::AddAsset { draft: good, now: test_now() }),
            Effect::AssetAdded
        );
        assert_eq!(app.ledger.list_assets().len(), before + 1);
        assert!(app.form_issues.is_none());
    }

    #[test]
    fn test_reset_demo_and_quit() {
        let mut app = test_app();
        update(
            &mut app,
            Action::CheckIn {
                asset_id: "EQ-001".to_string(),
                now: test_now(),
            },
        );
        update(&mut app, Action::Navigate(Route::History));
        assert_eq!(update(&mut app, Action::ResetDemo { now: test_now() }), Effect::RouteChanged);
        assert!(app.ledger.active_rental("EQ-001").is_some());
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
