//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Flow
//!
//! ```text
//! crossterm event → TuiEvent → component handle_event → component event
//!                 → dispatch() → core::update(Action) → Effect → TuiState
//! ```
//!
//! Every action that depends on time is stamped with `Utc::now()` here, the
//! only place the clock is read.
//!
//! ## Redraw Strategy
//!
//! Redraws happen after input and otherwise once every [`CLOCK_REFRESH`], so
//! overdue badges tick over without a keypress. Idle polling sleeps up to
//! 500ms between checks.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic.

mod component;
mod components;
mod event;
mod ui;

use log::{info, warn};
use std::io::stdout;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::core::action::{Action, Effect, update};
use crate::core::route::Route;
use crate::core::state::App;
use crate::tui::components::{
    AssetFormState, DashboardEvent, DashboardState, FormEvent, HistoryEvent, HistoryState,
    RentalFormState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// How often to redraw with no input, so time-derived status stays current.
const CLOCK_REFRESH: Duration = Duration::from_secs(30);
const IDLE_POLL: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core business logic)
#[derive(Default)]
pub struct TuiState {
    // Persistent component states
    pub dashboard: DashboardState,
    pub history: HistoryState,
    /// Present while the route is a rental form
    pub rental_form: Option<RentalFormState>,
    /// Add-equipment overlay (None = hidden)
    pub asset_form: Option<AssetFormState>,
}

impl TuiState {
    pub fn new() -> Self {
        Self::default()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol is harmlessly ignored by terminals that don't support it
        execute!(
            stdout(),
            EnableBracketedPaste,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!(
            "Terminal modes enabled (bracketed paste, steady block cursor, keyboard enhancement)"
        );
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableBracketedPaste,
            SetCursorStyle::DefaultUserShape,
            Show
        );
    }
}

pub fn run(app: App) -> std::io::Result<()> {
    let mut app = app;
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let terminal_mode_guard = TerminalModeGuard::new();
    if let Err(e) = &terminal_mode_guard {
        warn!("Could not enable terminal modes: {}", e);
    }

    let result = event_loop(&mut terminal, &mut app, &mut tui);

    drop(terminal_mode_guard);
    ratatui::restore();
    info!("Rentrack exiting");
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    tui: &mut TuiState,
) -> std::io::Result<()> {
    let mut needs_redraw = true; // Force first frame
    let mut last_draw = Instant::now();

    loop {
        if needs_redraw || last_draw.elapsed() >= CLOCK_REFRESH {
            let now = Utc::now();
            terminal.draw(|f| ui::draw_ui(f, app, tui, now))?;
            needs_redraw = false;
            last_draw = Instant::now();
        }

        let first_event = poll_event_timeout(IDLE_POLL);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            // Resize just needs a redraw (already flagged above)
            if matches!(event, TuiEvent::Resize) {
                continue;
            }
            if dispatch(app, tui, event, Utc::now()) == Effect::Quit {
                return Ok(());
            }
        }
    }
}

/// Route one input event to whichever component has focus and turn its
/// output into core actions.
fn dispatch(app: &mut App, tui: &mut TuiState, event: TuiEvent, now: DateTime<Utc>) -> Effect {
    // ForceQuit (Ctrl+C) always quits
    if matches!(event, TuiEvent::ForceQuit) {
        return apply(app, tui, Action::Quit);
    }

    // When the add-equipment overlay is open, route all events to it
    if let Some(form) = tui.asset_form.as_mut() {
        return match form.handle_event(&event) {
            Some(FormEvent::Submit) => {
                let draft = form.draft();
                let effect = apply(app, tui, Action::AddAsset { draft, now });
                if let Some(form) = tui.asset_form.as_mut() {
                    form.fields.apply_issues(app.form_issues.as_ref());
                    form.fields.focus_first_issue();
                }
                effect
            }
            Some(FormEvent::Cancel) => {
                tui.asset_form = None;
                app.form_issues = None;
                Effect::None
            }
            None => Effect::None,
        };
    }

    match app.route.clone() {
        Route::Dashboard => match tui.dashboard.handle_event(&event) {
            Some(DashboardEvent::Rent(asset_id)) => {
                apply(app, tui, Action::Navigate(Route::RentalForm { asset_id }))
            }
            Some(DashboardEvent::CheckIn(asset_id)) => {
                apply(app, tui, Action::CheckIn { asset_id, now })
            }
            Some(DashboardEvent::AddAsset) => {
                app.form_issues = None;
                tui.asset_form = Some(AssetFormState::new(&app.default_site));
                Effect::None
            }
            Some(DashboardEvent::History) => apply(app, tui, Action::Navigate(Route::History)),
            Some(DashboardEvent::ResetDemo) => apply(app, tui, Action::ResetDemo { now }),
            Some(DashboardEvent::DismissError) => apply(app, tui, Action::DismissError),
            Some(DashboardEvent::Quit) => apply(app, tui, Action::Quit),
            None => Effect::None,
        },

        Route::RentalForm { asset_id } => {
            let form = tui.rental_form.get_or_insert_with(|| {
                RentalFormState::new(asset_id, &app.default_site, app.default_rental_days)
            });
            match form.handle_event(&event) {
                Some(FormEvent::Submit) => {
                    let draft = form.draft();
                    let effect = apply(app, tui, Action::SubmitRental { draft, now });
                    if let Some(form) = tui.rental_form.as_mut() {
                        form.fields.apply_issues(app.form_issues.as_ref());
                        form.fields.focus_first_issue();
                    }
                    effect
                }
                Some(FormEvent::Cancel) => apply(app, tui, Action::Navigate(Route::Dashboard)),
                None => Effect::None,
            }
        }

        Route::History => match tui.history.handle_event(&event) {
            Some(HistoryEvent::CheckIn(asset_id)) => {
                apply(app, tui, Action::CheckIn { asset_id, now })
            }
            Some(HistoryEvent::Back) => apply(app, tui, Action::Navigate(Route::Dashboard)),
            Some(HistoryEvent::Quit) => apply(app, tui, Action::Quit),
            None => Effect::None,
        },
    }
}

/// Run an action through core and reconcile presentation state with the effect.
fn apply(app: &mut App, tui: &mut TuiState, action: Action) -> Effect {
    let effect = update(app, action);
    match effect {
        Effect::RouteChanged => {
            tui.rental_form = match &app.route {
                Route::RentalForm { asset_id } => Some(RentalFormState::new(
                    asset_id.clone(),
                    &app.default_site,
                    app.default_rental_days,
                )),
                _ => None,
            };
        }
        Effect::AssetAdded => tui.asset_form = None,
        Effect::None | Effect::Quit => {}
    }
    effect
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::form::FormField;
    use crate::core::model::AssetStatus;
    use crate::core::view;
    use crate::test_support::{test_app, test_now};

    fn synced(app: &App) -> TuiState {
        let mut tui = TuiState::new();
        tui.dashboard
            .sync_rows(&view::dashboard(&app.ledger, test_now()).rows);
        tui.history.sync_rows(&view::history(&app.ledger, test_now()).rows);
        tui
    }

    fn send(app: &mut App, tui: &mut TuiState, events: &[TuiEvent]) -> Effect {
        let mut last = Effect::None;
        for event in events {
            last = dispatch(app, tui, event.clone(), test_now());
        }
        last
    }

    fn type_text(text: &str) -> TuiEvent {
        TuiEvent::Paste(text.to_string())
    }

    #[test]
    fn test_rent_flow_from_dashboard() {
        let mut app = test_app();
        let mut tui = synced(&app);

        // Row 0 is EQ-001, row 1 is the idle EQ-002
        send(&mut app, &mut tui, &[TuiEvent::CursorDown, TuiEvent::Submit]);
        assert_eq!(
            app.route,
            Route::RentalForm {
                asset_id: "EQ-002".to_string()
            }
        );
        assert!(tui.rental_form.is_some());

        let effect = send(
            &mut app,
            &mut tui,
            &[
                type_text("Jo Park"),
                TuiEvent::NextField,
                type_text("555-0133"),
                TuiEvent::Submit,
            ],
        );
        assert_eq!(effect, Effect::RouteChanged);
        assert_eq!(app.route, Route::Dashboard);
        assert!(tui.rental_form.is_none());
        assert_eq!(app.ledger.asset("EQ-002").unwrap().status, AssetStatus::Rented);
    }

    #[test]
    fn test_invalid_rental_focuses_first_issue() {
        let mut app = test_app();
        let mut tui = synced(&app);
        send(&mut app, &mut tui, &[TuiEvent::CursorDown, TuiEvent::Submit]);

        // Fill the name only, so phone is the first missing field
        send(
            &mut app,
            &mut tui,
            &[type_text("Jo Park"), TuiEvent::NextField, TuiEvent::Submit],
        );
        let form = tui.rental_form.as_ref().unwrap();
        assert_eq!(form.fields.focused(), FormField::Phone);
        assert!(app.form_issues.is_some());
        assert_eq!(app.ledger.asset("EQ-002").unwrap().status, AssetStatus::Idle);

        send(&mut app, &mut tui, &[TuiEvent::Escape]);
        assert_eq!(app.route, Route::Dashboard);
        assert!(app.form_issues.is_none());
    }

    #[test]
    fn test_rent_on_rented_asset_shows_error() {
        let mut app = test_app();
        let mut tui = synced(&app);
        send(&mut app, &mut tui, &[TuiEvent::Submit]);
        assert_eq!(app.route, Route::Dashboard);
        assert!(app.error.is_some());
        send(&mut app, &mut tui, &[TuiEvent::Escape]);
        assert!(app.error.is_none());
    }

    #[test]
    fn test_check_in_from_dashboard() {
        let mut app = test_app();
        let mut tui = synced(&app);
        send(&mut app, &mut tui, &[TuiEvent::InputChar('c')]);
        assert!(app.ledger.active_rental("EQ-001").is_none());
        assert!(app.status_message.starts_with("Checked in Mini Excavator"));
    }

    #[test]
    fn test_add_asset_overlay() {
        let mut app = test_app();
        let mut tui = synced(&app);
        let before = app.ledger.list_assets().len();

        send(&mut app, &mut tui, &[TuiEvent::InputChar('a')]);
        assert!(tui.asset_form.is_some());
        // Keys go to the overlay, not the dashboard
        send(&mut app, &mut tui, &[TuiEvent::InputChar('q')]);
        assert!(tui.asset_form.is_some());
        send(&mut app, &mut tui, &[TuiEvent::Escape]);
        assert!(tui.asset_form.is_none());

        let effect = send(
            &mut app,
            &mut tui,
            &[
                TuiEvent::InputChar('a'),
                type_text("Skid Steer"),
                TuiEvent::NextField,
                type_text("Earthmoving"),
                TuiEvent::Submit,
            ],
        );
        assert_eq!(effect, Effect::AssetAdded);
        assert!(tui.asset_form.is_none());
        assert_eq!(app.ledger.list_assets().len(), before + 1);
    }

    #[test]
    fn test_history_navigation_and_check_in() {
        let mut app = test_app();
        let mut tui = synced(&app);
        send(&mut app, &mut tui, &[TuiEvent::InputChar('h')]);
        assert_eq!(app.route, Route::History);

        send(&mut app, &mut tui, &[TuiEvent::InputChar('c')]);
        assert!(app.ledger.active_rental("EQ-001").is_none());

        send(&mut app, &mut tui, &[TuiEvent::InputChar('d')]);
        assert_eq!(app.route, Route::Dashboard);
    }

    #[test]
    fn test_quit_paths() {
        let mut app = test_app();
        let mut tui = synced(&app);
        assert_eq!(send(&mut app, &mut tui, &[TuiEvent::ForceQuit]), Effect::Quit);
        assert_eq!(send(&mut app, &mut tui, &[TuiEvent::InputChar('q')]), Effect::Quit);
    }
}
