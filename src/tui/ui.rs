use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::route::Route;
use crate::core::state::App;
use crate::core::view;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{
    AssetForm, Dashboard, History, RentalForm, RentalFormState, TitleBar,
};

/// Draw one frame. View models are rebuilt from the ledger every call so the
/// screen can never lag behind a mutation.
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, now: DateTime<Utc>) {
    use Constraint::{Length, Min};
    let [title_area, main_area, footer_area] =
        Layout::vertical([Length(1), Min(0), Length(1)]).areas(frame.area());

    TitleBar::new(
        app.route.title(),
        app.status_message.clone(),
        app.ledger.storage_warning().map(str::to_string),
        app.ledger.store_name(),
    )
    .render(frame, title_area);

    match &app.route {
        Route::Dashboard => {
            let view = view::dashboard(&app.ledger, now);
            Dashboard::new(&mut tui.dashboard, &view, &app.date_format).render(frame, main_area);
        }
        Route::History => {
            let view = view::history(&app.ledger, now);
            History::new(&mut tui.history, &view, &app.date_format).render(frame, main_area);
        }
        Route::RentalForm { asset_id } => {
            if tui
                .rental_form
                .as_ref()
                .is_none_or(|form| &form.asset_id != asset_id)
            {
                tui.rental_form = Some(RentalFormState::new(
                    asset_id.clone(),
                    &app.default_site,
                    app.default_rental_days,
                ));
            }
            if let Some(state) = tui.rental_form.as_mut() {
                RentalForm::new(state, app.ledger.asset(asset_id), app.form_issues.as_ref())
                    .render(frame, main_area);
            }
        }
    }

    if let Some(state) = tui.asset_form.as_mut() {
        AssetForm::new(state, app.form_issues.as_ref()).render(frame, main_area);
    }

    draw_footer(frame, footer_area, app);
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let line = match &app.error {
        Some(error) => Line::from(vec![
            Span::styled(
                " ERROR ",
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {}", error), Style::default().fg(Color::Red)),
            Span::styled("  (Esc to dismiss)", Style::default().fg(Color::DarkGray)),
        ]),
        None => Line::styled(
            format!(" {}", app.route),
            Style::default().fg(Color::DarkGray),
        ),
    };
    frame.render_widget(Paragraph::new(line), area);
}
