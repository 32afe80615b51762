//! # Rental Form
//!
//! The `#/rent/<id>` view: customer and handover details for one asset.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `RentalFormState` lives in `TuiState` while the route is a rental form
//! - `RentalForm` is created each frame with the asset and current issues

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};

use crate::core::form::{self, FormField, RentalDraft, ValidationError};
use crate::core::model::Asset;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::form_fields::{FormEvent, FormFields};
use crate::tui::event::TuiEvent;

const RENTAL_FIELDS: [FormField; 8] = [
    FormField::CustomerName,
    FormField::Phone,
    FormField::Email,
    FormField::Site,
    FormField::ExpectedReturn,
    FormField::FuelAtStart,
    FormField::OdometerAtStart,
    FormField::Notes,
];

pub struct RentalFormState {
    pub asset_id: String,
    pub fields: FormFields,
}

impl RentalFormState {
    pub fn new(asset_id: impl Into<String>, default_site: &str, default_rental_days: u32) -> Self {
        let fields = RENTAL_FIELDS
            .iter()
            .map(|&field| {
                let initial = match field {
                    FormField::Site => default_site.to_string(),
                    FormField::ExpectedReturn => form::default_return_input(default_rental_days),
                    _ => String::new(),
                };
                (field, initial)
            })
            .collect();
        Self {
            asset_id: asset_id.into(),
            fields: FormFields::new(fields),
        }
    }

    pub fn draft(&self) -> RentalDraft {
        RentalDraft {
            asset_id: self.asset_id.clone(),
            customer_name: self.fields.value(FormField::CustomerName),
            phone: self.fields.value(FormField::Phone),
            email: self.fields.value(FormField::Email),
            site: self.fields.value(FormField::Site),
            expected_return: self.fields.value(FormField::ExpectedReturn),
            fuel_at_start: self.fields.value(FormField::FuelAtStart),
            odometer_at_start: self.fields.value(FormField::OdometerAtStart),
            notes: self.fields.value(FormField::Notes),
        }
    }

    pub fn handle_event(&mut self, event: &TuiEvent) -> Option<FormEvent> {
        self.fields.handle_event(event)
    }
}

pub struct RentalForm<'a> {
    state: &'a mut RentalFormState,
    asset: Option<&'a Asset>,
    issues: Option<&'a ValidationError>,
}

impl<'a> RentalForm<'a> {
    pub fn new(
        state: &'a mut RentalFormState,
        asset: Option<&'a Asset>,
        issues: Option<&'a ValidationError>,
    ) -> Self {
        Self {
            state,
            asset,
            issues,
        }
    }
}

impl Component for RentalForm<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = match self.asset {
            Some(asset) => format!(" Rent {} {} ", asset.image_emoji, asset.name),
            None => format!(" Rent {} ", self.state.asset_id),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title)
            .title_bottom(
                Line::from(" Tab/↓ Next  Shift+Tab/↑ Prev  Enter Check out  Esc Cancel ")
                    .centered(),
            )
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [header_area, fields_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(inner);

        let header = match self.asset {
            Some(asset) => vec![
                Line::from(vec![
                    Span::styled(
                        asset.id.clone(),
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!(
                        "  {} · {} · qty {}",
                        asset.category, asset.site, asset.quantity
                    )),
                ]),
                Line::styled(asset.description.clone(), Style::default().fg(Color::Gray)),
                Line::styled(
                    field_hint(self.state.fields.focused()),
                    Style::default().fg(Color::DarkGray),
                ),
            ],
            None => vec![Line::styled(
                "This asset is no longer in the ledger.",
                Style::default().fg(Color::Red),
            )],
        };
        frame.render_widget(Paragraph::new(header).wrap(Wrap { trim: true }), header_area);

        self.state.fields.apply_issues(self.issues);
        self.state.fields.render(frame, fields_area);
    }
}

fn field_hint(field: FormField) -> &'static str {
    match field {
        FormField::ExpectedReturn => {
            "Return: +3d, +12h, YYYY-MM-DD or YYYY-MM-DD HH:MM (local time)"
        }
        FormField::FuelAtStart => "Tank level as a percentage, 0-100. Optional.",
        FormField::OdometerAtStart => "Hours or miles on the meter. Optional.",
        FormField::Email => "Optional.",
        _ => "Required fields: customer name, phone, site, expected return.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ledger::Ledger;
    use crate::test_support::test_now;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_defaults_prefilled() {
        let state = RentalFormState::new("EQ-002", "Main Yard", 3);
        let draft = state.draft();
        assert_eq!(draft.asset_id, "EQ-002");
        assert_eq!(draft.site, "Main Yard");
        assert_eq!(draft.expected_return, "+3d");
        assert!(draft.customer_name.is_empty());
    }

    #[test]
    fn test_typed_values_reach_draft() {
        let mut state = RentalFormState::new("EQ-002", "Main Yard", 3);
        for c in "Lee".chars() {
            state.handle_event(&TuiEvent::InputChar(c));
        }
        state.handle_event(&TuiEvent::NextField);
        state.handle_event(&TuiEvent::Paste("555-0101".to_string()));
        assert_eq!(state.handle_event(&TuiEvent::Submit), Some(FormEvent::Submit));

        let draft = state.draft();
        assert_eq!(draft.customer_name, "Lee");
        assert_eq!(draft.phone, "555-0101");
        assert!(draft.validate(test_now()).is_ok());
    }

    #[test]
    fn test_render_shows_asset_and_issue() {
        let ledger = Ledger::in_memory(test_now());
        let asset = ledger.asset("EQ-002");
        let mut state = RentalFormState::new("EQ-002", "Main Yard", 3);
        let issues = state.draft().validate(test_now()).unwrap_err();

        let backend = TestBackend::new(90, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| RentalForm::new(&mut state, asset, Some(&issues)).render(f, f.area()))
            .unwrap();

        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("Scissor Lift"));
        assert!(text.contains("Customer name - required"));
    }
}
