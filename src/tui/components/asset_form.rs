//! # Add Equipment Overlay
//!
//! Centered overlay opened with `a` from the dashboard. Submitting produces an
//! [`AssetDraft`]; the overlay closes once the ledger accepts it.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `AssetFormState` lives in `TuiState` while the overlay is open
//! - `AssetForm` is created each frame with borrowed state

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Padding};

use crate::core::form::{AssetDraft, DEFAULT_ASSET_EMOJI, FormField, ValidationError};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::form_fields::{FormEvent, FormFields};
use crate::tui::event::TuiEvent;

const ASSET_FIELDS: [FormField; 6] = [
    FormField::Name,
    FormField::Category,
    FormField::Site,
    FormField::Quantity,
    FormField::Description,
    FormField::Emoji,
];

pub struct AssetFormState {
    pub fields: FormFields,
}

impl AssetFormState {
    pub fn new(default_site: &str) -> Self {
        let fields = ASSET_FIELDS
            .iter()
            .map(|&field| {
                let initial = match field {
                    FormField::Site => default_site.to_string(),
                    FormField::Quantity => "1".to_string(),
                    FormField::Emoji => DEFAULT_ASSET_EMOJI.to_string(),
                    _ => String::new(),
                };
                (field, initial)
            })
            .collect();
        Self {
            fields: FormFields::new(fields),
        }
    }

    pub fn draft(&self) -> AssetDraft {
        AssetDraft {
            name: self.fields.value(FormField::Name),
            category: self.fields.value(FormField::Category),
            site: self.fields.value(FormField::Site),
            quantity: self.fields.value(FormField::Quantity),
            description: self.fields.value(FormField::Description),
            emoji: self.fields.value(FormField::Emoji),
        }
    }

    pub fn handle_event(&mut self, event: &TuiEvent) -> Option<FormEvent> {
        self.fields.handle_event(event)
    }
}

/// Transient render wrapper for the add-equipment overlay.
pub struct AssetForm<'a> {
    state: &'a mut AssetFormState,
    issues: Option<&'a ValidationError>,
}

impl<'a> AssetForm<'a> {
    pub fn new(state: &'a mut AssetFormState, issues: Option<&'a ValidationError>) -> Self {
        Self { state, issues }
    }
}

impl Component for AssetForm<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        // borders, fields, one spare row
        let height = self.state.fields.height() + 3;
        let overlay = centered_rect(60, height, area);
        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Add equipment ")
            .title_bottom(Line::from(" Enter Save  Esc Cancel ").centered())
            .padding(Padding::horizontal(1));
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        self.state.fields.apply_issues(self.issues);
        self.state.fields.render(frame, inner);
    }
}

/// A rect `percent_x` wide and `height` rows tall, centered in `outer`.
fn centered_rect(percent_x: u16, height: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(outer.height)),
        Constraint::Fill(1),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_now;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_new_form_defaults() {
        let state = AssetFormState::new("North Depot");
        let draft = state.draft();
        assert_eq!(draft.site, "North Depot");
        assert_eq!(draft.quantity, "1");
        assert_eq!(draft.emoji, DEFAULT_ASSET_EMOJI);
        assert!(draft.validate(test_now()).is_err());
    }

    #[test]
    fn test_filled_form_validates() {
        let mut state = AssetFormState::new("North Depot");
        state.handle_event(&TuiEvent::Paste("Plate Compactor".to_string()));
        state.handle_event(&TuiEvent::NextField);
        state.handle_event(&TuiEvent::Paste("Compaction".to_string()));

        let asset = state.draft().validate(test_now()).unwrap();
        assert_eq!(asset.name, "Plate Compactor");
        assert_eq!(asset.category, "Compaction");
        assert_eq!(asset.quantity, 1);
    }

    #[test]
    fn test_overlay_renders_centered_title() {
        let backend = TestBackend::new(80, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = AssetFormState::new("Main Yard");

        terminal
            .draw(|f| AssetForm::new(&mut state, None).render(f, f.area()))
            .unwrap();

        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("Add equipment"));
        assert!(text.contains("Category"));
    }

    #[test]
    fn test_centered_rect_clamps_height() {
        let outer = Rect::new(0, 0, 100, 10);
        let rect = centered_rect(60, 40, outer);
        assert_eq!(rect.height, 10);
        assert_eq!(rect.width, 60);
    }
}
