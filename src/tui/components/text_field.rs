//! # TextField Component
//!
//! Single-line text input used by the rental and add-equipment forms.
//!
//! ## State Management
//!
//! The value and cursor are internal state. `focused` and `issue` are props
//! set by the owning form each frame. The cursor is a byte offset that always
//! sits on a char boundary; rendering converts it to a screen column with
//! `unicode-width` so wide glyphs (emoji) place the cursor correctly.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::form::FormField;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Rows a field occupies: one line of text plus top and bottom borders.
pub const FIELD_HEIGHT: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEvent {
    Changed,
    CursorMoved,
}

pub struct TextField {
    pub field: FormField,
    pub value: String,
    /// Prop: whether this field has keyboard focus.
    pub focused: bool,
    /// Prop: validation message to show under the label.
    pub issue: Option<String>,
    /// Cursor position as byte offset in value (0..=value.len())
    cursor: usize,
}

impl TextField {
    pub fn new(field: FormField, initial: impl Into<String>) -> Self {
        let value = initial.into();
        Self {
            field,
            cursor: value.len(),
            value,
            focused: false,
            issue: None,
        }
    }

    /// Horizontal scroll so the cursor stays inside `inner_width` columns.
    /// Returns (byte offset where the visible text starts, cursor column).
    fn visible_window(&self, inner_width: u16) -> (usize, u16) {
        let inner_width = usize::from(inner_width.max(1));
        let mut start = 0;
        while self.value[start..self.cursor].width() >= inner_width {
            start = next_char_boundary(&self.value, start);
        }
        (start, self.value[start..self.cursor].width() as u16)
    }
}

impl Component for TextField {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let (border_style, title) = match (&self.issue, self.focused) {
            (Some(issue), _) => (
                Style::default().fg(Color::Red),
                format!(" {} - {} ", self.field.label(), issue),
            ),
            (None, true) => (
                Style::default().fg(Color::Cyan),
                format!(" {} ", self.field.label()),
            ),
            (None, false) => (
                Style::default().fg(Color::DarkGray),
                format!(" {} ", self.field.label()),
            ),
        };

        let inner_width = area.width.saturating_sub(2);
        let (start, cursor_col) = self.visible_window(inner_width);

        let text_style = if self.focused {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)
        };
        let paragraph = Paragraph::new(Line::from(&self.value[start..]))
            .style(text_style)
            .block(
                Block::bordered()
                    .border_style(border_style)
                    .title(title)
                    .title_style(border_style),
            );
        frame.render_widget(paragraph, area);

        if self.focused {
            frame.set_cursor_position((area.x + 1 + cursor_col, area.y + 1));
        }
    }
}

impl EventHandler for TextField {
    type Event = FieldEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) if !c.is_control() => {
                self.value.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                Some(FieldEvent::Changed)
            }
            TuiEvent::Paste(text) => {
                let single_line: String = text.chars().filter(|c| !c.is_control()).collect();
                if single_line.is_empty() {
                    return None;
                }
                self.value.insert_str(self.cursor, &single_line);
                self.cursor += single_line.len();
                Some(FieldEvent::Changed)
            }
            TuiEvent::Backspace => (self.cursor > 0).then(|| {
                let prev = prev_char_boundary(&self.value, self.cursor);
                self.value.drain(prev..self.cursor);
                self.cursor = prev;
                FieldEvent::Changed
            }),
            TuiEvent::Delete => (self.cursor < self.value.len()).then(|| {
                let next = next_char_boundary(&self.value, self.cursor);
                self.value.drain(self.cursor..next);
                FieldEvent::Changed
            }),
            TuiEvent::CursorLeft => (self.cursor > 0).then(|| {
                self.cursor = prev_char_boundary(&self.value, self.cursor);
                FieldEvent::CursorMoved
            }),
            TuiEvent::CursorRight => (self.cursor < self.value.len()).then(|| {
                self.cursor = next_char_boundary(&self.value, self.cursor);
                FieldEvent::CursorMoved
            }),
            TuiEvent::CursorHome => (self.cursor != 0).then(|| {
                self.cursor = 0;
                FieldEvent::CursorMoved
            }),
            TuiEvent::CursorEnd => (self.cursor != self.value.len()).then(|| {
                self.cursor = self.value.len();
                FieldEvent::CursorMoved
            }),
            _ => None,
        }
    }
}

fn prev_char_boundary(s: &str, pos: usize) -> usize {
    s[..pos].char_indices().next_back().map_or(0, |(i, _)| i)
}

fn next_char_boundary(s: &str, pos: usize) -> usize {
    s[pos..].chars().next().map_or(pos, |c| pos + c.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_typing_and_backspace() {
        let mut field = TextField::new(FormField::CustomerName, "");
        assert_eq!(field.handle_event(&TuiEvent::InputChar('J')), Some(FieldEvent::Changed));
        field.handle_event(&TuiEvent::InputChar('o'));
        assert_eq!(field.value, "Jo");
        field.handle_event(&TuiEvent::Backspace);
        assert_eq!(field.value, "J");
        assert_eq!(field.cursor, 1);
    }

    #[test]
    fn test_cursor_moves_over_multibyte_chars() {
        let mut field = TextField::new(FormField::Emoji, "a🚜b");
        assert_eq!(field.cursor, field.value.len());
        field.handle_event(&TuiEvent::CursorLeft);
        field.handle_event(&TuiEvent::CursorLeft);
        assert_eq!(field.cursor, 1);
        field.handle_event(&TuiEvent::Delete);
        assert_eq!(field.value, "ab");
        assert_eq!(field.handle_event(&TuiEvent::CursorHome), Some(FieldEvent::CursorMoved));
        assert_eq!(field.handle_event(&TuiEvent::CursorHome), None);
        field.handle_event(&TuiEvent::InputChar('>'));
        assert_eq!(field.value, ">ab");
    }

    #[test]
    fn test_paste_strips_newlines() {
        let mut field = TextField::new(FormField::Notes, "");
        field.handle_event(&TuiEvent::Paste("line one\nline two".to_string()));
        assert_eq!(field.value, "line oneline two");
        assert_eq!(field.handle_event(&TuiEvent::Paste("\n".to_string())), None);
    }

    #[test]
    fn test_window_scrolls_to_keep_cursor_visible() {
        let field = TextField::new(FormField::Notes, "abcdefghij");
        let (start, col) = field.visible_window(4);
        assert_eq!(start, 7);
        assert_eq!(col, 3);
    }

    #[test]
    fn test_render_shows_label_and_issue() {
        let backend = TestBackend::new(50, FIELD_HEIGHT);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut field = TextField::new(FormField::Phone, "");
        field.issue = Some("required".to_string());

        terminal.draw(|f| field.render(f, f.area())).unwrap();

        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("Phone - required"));
    }
}
