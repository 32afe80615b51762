//! # TitleBar Component
//!
//! Top status bar showing where the user is and what just happened.
//!
//! ## Design Decisions
//!
//! ### Stateless Component
//!
//! TitleBar is purely presentational. It receives all data as props and has
//! no internal state:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new("Dashboard", "Checked in Mini Excavator", None, "file");
//! title_bar.render(frame, area);
//! ```
//!
//! ## Conditional Formatting
//!
//! 1. **Storage warning**: `"Rentrack | Dashboard | Checked in X | ⚠ Changes not saved: ..."`
//! 2. **Status message**: `"Rentrack | Dashboard | Checked in X"`
//! 3. **Default**: `"Rentrack | Dashboard"`
//!
//! The store name is right-aligned when the terminal is wide enough.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

pub struct TitleBar {
    /// Title of the current route (e.g., "Dashboard")
    pub route_title: String,
    /// Status message (e.g., "Checked out Scissor Lift to Jo Park")
    pub status_message: String,
    /// Set when the last write to the store failed
    pub storage_warning: Option<String>,
    /// Which store backs the ledger ("file" or "memory")
    pub store_name: String,
}

impl TitleBar {
    pub fn new(
        route_title: impl Into<String>,
        status_message: impl Into<String>,
        storage_warning: Option<String>,
        store_name: impl Into<String>,
    ) -> Self {
        Self {
            route_title: route_title.into(),
            status_message: status_message.into(),
            storage_warning,
            store_name: store_name.into(),
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled("Rentrack", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(" | {}", self.route_title)),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::raw(format!(" | {}", self.status_message)));
        }
        if let Some(warning) = &self.storage_warning {
            spans.push(Span::styled(
                format!(" | ⚠ Changes not saved: {}", warning),
                Style::default().fg(Color::Yellow),
            ));
        }

        let store_label = format!("[{}] ", self.store_name);
        let [left, right] = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(store_label.len() as u16),
        ])
        .areas(area);

        frame.render_widget(Paragraph::new(Line::from(spans)), left);
        frame.render_widget(
            Paragraph::new(store_label).style(Style::default().fg(Color::DarkGray)),
            right,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_text(title_bar: &mut TitleBar, width: u16) -> String {
        let backend = TestBackend::new(width, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| title_bar.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_title_bar_with_status_message() {
        let mut title_bar = TitleBar::new("Dashboard", "Checked in Mini Excavator", None, "file");
        let text = render_text(&mut title_bar, 100);

        assert!(text.contains("Rentrack | Dashboard | Checked in Mini Excavator"));
        assert!(text.contains("[file]"));
        assert!(!text.contains("not saved"));
    }

    #[test]
    fn test_title_bar_default_no_status() {
        let mut title_bar = TitleBar::new("History", "", None, "memory");
        let text = render_text(&mut title_bar, 60);

        assert!(text.contains("Rentrack | History"));
        assert_eq!(text.matches('|').count(), 1);
    }

    #[test]
    fn test_title_bar_storage_warning() {
        let mut title_bar = TitleBar::new(
            "Dashboard",
            "Added Skid Steer",
            Some("disk full".to_string()),
            "file",
        );
        let text = render_text(&mut title_bar, 120);

        assert!(text.contains("Changes not saved: disk full"));
    }
}
