//! # Form Fields
//!
//! A focusable stack of [`TextField`]s shared by the rental form and the
//! add-equipment overlay. Tab/Down and Shift+Tab/Up move focus, Enter submits,
//! Esc cancels, and everything else goes to the focused field.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::form::{FormField, ValidationError};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::text_field::{FIELD_HEIGHT, TextField};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    Submit,
    Cancel,
}

pub struct FormFields {
    fields: Vec<TextField>,
    focused: usize,
}

impl FormFields {
    pub fn new(fields: Vec<(FormField, String)>) -> Self {
        let fields = fields
            .into_iter()
            .map(|(field, initial)| TextField::new(field, initial))
            .collect();
        Self { fields, focused: 0 }
    }

    pub fn value(&self, field: FormField) -> String {
        self.fields
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.value.clone())
            .unwrap_or_default()
    }

    pub fn focused(&self) -> FormField {
        self.fields[self.focused].field
    }

    /// Total rows needed to show every field.
    pub fn height(&self) -> u16 {
        FIELD_HEIGHT * self.fields.len() as u16
    }

    /// Copy validation messages onto their fields; `None` clears them.
    pub fn apply_issues(&mut self, issues: Option<&ValidationError>) {
        for f in &mut self.fields {
            f.issue = issues
                .and_then(|e| e.issue_for(f.field))
                .map(str::to_string);
        }
    }

    /// Move focus to the first field with an issue, if any.
    pub fn focus_first_issue(&mut self) {
        if let Some(i) = self.fields.iter().position(|f| f.issue.is_some()) {
            self.focused = i;
        }
    }

    fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % self.fields.len();
    }

    fn focus_prev(&mut self) {
        self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
    }
}

impl Component for FormFields {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical(
            self.fields
                .iter()
                .map(|_| Constraint::Length(FIELD_HEIGHT))
                .chain(std::iter::once(Constraint::Min(0))),
        )
        .split(area);

        let focused = self.focused;
        for (i, (field, row)) in self.fields.iter_mut().zip(rows.iter()).enumerate() {
            field.focused = i == focused;
            field.render(frame, *row);
        }
    }
}

impl EventHandler for FormFields {
    type Event = FormEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Submit => Some(FormEvent::Submit),
            TuiEvent::Escape => Some(FormEvent::Cancel),
            TuiEvent::NextField | TuiEvent::CursorDown => {
                self.focus_next();
                None
            }
            TuiEvent::PrevField | TuiEvent::CursorUp => {
                self.focus_prev();
                None
            }
            other => {
                self.fields[self.focused].handle_event(other);
                None
            }
        }
    }
}
