//! # Dashboard
//!
//! The `#/` view: every asset with its derived status, plus a fleet summary.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `DashboardState` lives in `TuiState` (selection survives re-renders)
//! - `Dashboard` is created each frame from a freshly built `DashboardView`
//!
//! Row ids are cached at render time so key handling can map the selection
//! back to an asset without reaching into the ledger.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::core::status::{RentalState, Severity};
use crate::core::view::{AssetRow, DashboardView};
use crate::tui::component::Component;
use crate::tui::components::format_local;
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    Rent(String),
    CheckIn(String),
    AddAsset,
    History,
    ResetDemo,
    DismissError,
    Quit,
}

#[derive(Default)]
pub struct DashboardState {
    pub selected: usize,
    pub confirm_reset: bool,
    table_state: TableState,
    asset_ids: Vec<String>,
}

impl DashboardState {
    /// Cache the ids of the rows about to be shown and keep the selection in range.
    pub fn sync_rows(&mut self, rows: &[AssetRow]) {
        self.asset_ids = rows.iter().map(|r| r.asset.id.clone()).collect();
        if self.asset_ids.is_empty() {
            self.selected = 0;
            self.table_state.select(None);
        } else {
            self.selected = self.selected.min(self.asset_ids.len() - 1);
            self.table_state.select(Some(self.selected));
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.asset_ids.get(self.selected).map(String::as_str)
    }

    pub fn handle_event(&mut self, event: &TuiEvent) -> Option<DashboardEvent> {
        // Reset confirmation on any key other than the reset key
        if !matches!(event, TuiEvent::InputChar('r')) {
            self.confirm_reset = false;
        }

        match event {
            TuiEvent::CursorUp => {
                self.move_selection(-1);
                None
            }
            TuiEvent::CursorDown => {
                self.move_selection(1);
                None
            }
            TuiEvent::PageUp | TuiEvent::CursorHome => {
                self.move_selection(isize::MIN);
                None
            }
            TuiEvent::PageDown | TuiEvent::CursorEnd => {
                self.move_selection(isize::MAX);
                None
            }
            TuiEvent::Submit => self.selected_id().map(|id| DashboardEvent::Rent(id.to_string())),
            TuiEvent::InputChar('c') => self
                .selected_id()
                .map(|id| DashboardEvent::CheckIn(id.to_string())),
            TuiEvent::InputChar('a') => Some(DashboardEvent::AddAsset),
            TuiEvent::InputChar('h') => Some(DashboardEvent::History),
            TuiEvent::InputChar('q') => Some(DashboardEvent::Quit),
            TuiEvent::Escape => Some(DashboardEvent::DismissError),
            TuiEvent::InputChar('r') => {
                if self.confirm_reset {
                    self.confirm_reset = false;
                    Some(DashboardEvent::ResetDemo)
                } else {
                    self.confirm_reset = true;
                    None
                }
            }
            _ => None,
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.asset_ids.is_empty() {
            return;
        }
        let last = self.asset_ids.len() - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(last);
        self.table_state.select(Some(self.selected));
    }
}

/// Transient render wrapper for the dashboard.
pub struct Dashboard<'a> {
    state: &'a mut DashboardState,
    view: &'a DashboardView,
    date_format: &'a str,
}

impl<'a> Dashboard<'a> {
    pub fn new(
        state: &'a mut DashboardState,
        view: &'a DashboardView,
        date_format: &'a str,
    ) -> Self {
        Self {
            state,
            view,
            date_format,
        }
    }

    fn summary_line(&self) -> Line<'static> {
        let s = &self.view.summary;
        Line::from(vec![
            Span::raw(format!("{} assets ({} units)  ", s.total_assets, s.total_units)),
            Span::styled(format!("{} available  ", s.available), Style::default().fg(Color::Green)),
            Span::styled(format!("{} rented  ", s.rented), Style::default().fg(Color::Yellow)),
            Span::styled(format!("{} overdue  ", s.overdue), Style::default().fg(Color::Red)),
            Span::styled(
                format!("{:.0}% utilization", s.utilization_pct),
                Style::default().fg(Color::Gray),
            ),
        ])
    }

    fn row(&self, row: &AssetRow) -> Row<'static> {
        let status_style = match row.state {
            RentalState::Available => Style::default().fg(Color::Green),
            RentalState::Rented => Style::default().fg(Color::Yellow),
            RentalState::Overdue => match row.severity {
                Some(Severity::Critical) => {
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                }
                _ => Style::default().fg(Color::Red),
            },
        };
        let status = match row.severity {
            Some(severity) => format!("{} ({})", row.status_label(), severity.label()),
            None => row.status_label(),
        };
        let due = row
            .due_at
            .map(|at| format_local(at, self.date_format))
            .unwrap_or_default();

        Row::new(vec![
            Cell::from(row.asset.image_emoji.clone()),
            Cell::from(row.asset.id.clone()),
            Cell::from(row.asset.name.clone()),
            Cell::from(row.asset.category.clone()),
            Cell::from(row.asset.site.clone()),
            Cell::from(row.asset.quantity.to_string()),
            Cell::from(status).style(status_style),
            Cell::from(row.customer.clone().unwrap_or_default()),
            Cell::from(due),
        ])
    }
}

impl Component for Dashboard<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.sync_rows(&self.view.rows);

        let help = if self.state.confirm_reset {
            " Press r again to restore demo data | any other key cancels "
        } else {
            " Enter Rent  c Check in  a Add  h History  r Reset  q Quit "
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Equipment ")
            .title_bottom(Line::from(help).centered());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [summary_area, table_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(inner);
        frame.render_widget(Paragraph::new(self.summary_line()), summary_area);

        if self.view.rows.is_empty() {
            frame.render_widget(
                Paragraph::new("No equipment yet. Press a to add some.")
                    .style(Style::default().fg(Color::DarkGray))
                    .centered(),
                table_area,
            );
            return;
        }

        let header = Row::new(vec![
            "", "ID", "Name", "Category", "Site", "Qty", "Status", "Customer", "Due",
        ])
        .style(Style::default().add_modifier(Modifier::BOLD));
        let rows: Vec<Row> = self.view.rows.iter().map(|r| self.row(r)).collect();
        let widths = [
            Constraint::Length(2),
            Constraint::Length(8),
            Constraint::Fill(2),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Length(3),
            Constraint::Length(22),
            Constraint::Fill(1),
            Constraint::Length(13),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(table, table_area, &mut self.state.table_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ledger::Ledger;
    use crate::core::view;
    use crate::test_support::test_now;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn synced_state() -> (DashboardState, DashboardView) {
        let ledger = Ledger::in_memory(test_now());
        let view = view::dashboard(&ledger, test_now());
        let mut state = DashboardState::default();
        state.sync_rows(&view.rows);
        (state, view)
    }

    #[test]
    fn test_selection_clamps_and_maps_to_ids() {
        let (mut state, view) = synced_state();
        assert_eq!(state.selected_id(), Some("EQ-001"));
        state.handle_event(&TuiEvent::CursorUp);
        assert_eq!(state.selected, 0);
        state.handle_event(&TuiEvent::PageDown);
        assert_eq!(state.selected, view.rows.len() - 1);
        state.handle_event(&TuiEvent::CursorDown);
        assert_eq!(state.selected, view.rows.len() - 1);
        state.handle_event(&TuiEvent::CursorHome);
        state.handle_event(&TuiEvent::CursorDown);
        assert_eq!(
            state.handle_event(&TuiEvent::Submit),
            Some(DashboardEvent::Rent("EQ-002".to_string()))
        );
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('c')),
            Some(DashboardEvent::CheckIn("EQ-002".to_string()))
        );
    }

    #[test]
    fn test_reset_needs_confirmation() {
        let (mut state, _) = synced_state();
        assert_eq!(state.handle_event(&TuiEvent::InputChar('r')), None);
        assert!(state.confirm_reset);
        assert_eq!(state.handle_event(&TuiEvent::CursorDown), None);
        assert!(!state.confirm_reset);
        state.handle_event(&TuiEvent::InputChar('r'));
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('r')),
            Some(DashboardEvent::ResetDemo)
        );
    }

    #[test]
    fn test_empty_dashboard_emits_no_row_events() {
        let mut state = DashboardState::default();
        state.sync_rows(&[]);
        assert_eq!(state.handle_event(&TuiEvent::Submit), None);
        assert_eq!(state.handle_event(&TuiEvent::InputChar('a')), Some(DashboardEvent::AddAsset));
    }

    #[test]
    fn test_render_shows_overdue_row_and_summary() {
        let (mut state, view) = synced_state();
        let backend = TestBackend::new(140, 16);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|f| Dashboard::new(&mut state, &view, "%b %d %H:%M").render(f, f.area()))
            .unwrap();

        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("Overdue 3d (critical)"));
        assert!(text.contains("Dana Ortiz"));
        assert!(text.contains("1 overdue"));
        assert!(text.contains("Available"));
    }
}
