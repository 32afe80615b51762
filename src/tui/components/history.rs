//! # History
//!
//! The `#/history` view: every rental newest first, with how each one stands,
//! and a customer reliability panel underneath.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::core::status::RentalStanding;
use crate::core::view::{HistoryRow, HistoryView};
use crate::tui::component::Component;
use crate::tui::components::format_local;
use crate::tui::event::TuiEvent;

/// Customers listed in the reliability panel.
const CUSTOMER_PANEL_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEvent {
    /// Check in the asset of the selected (still open) rental.
    CheckIn(String),
    Back,
    Quit,
}

#[derive(Default)]
pub struct HistoryState {
    pub selected: usize,
    table_state: TableState,
    /// (asset id, still open) per row, cached at render time.
    rows: Vec<(String, bool)>,
}

impl HistoryState {
    pub fn sync_rows(&mut self, rows: &[HistoryRow]) {
        self.rows = rows
            .iter()
            .map(|r| (r.rental.asset_id.clone(), r.rental.is_active()))
            .collect();
        if self.rows.is_empty() {
            self.selected = 0;
            self.table_state.select(None);
        } else {
            self.selected = self.selected.min(self.rows.len() - 1);
            self.table_state.select(Some(self.selected));
        }
    }

    pub fn handle_event(&mut self, event: &TuiEvent) -> Option<HistoryEvent> {
        match event {
            TuiEvent::CursorUp => {
                self.selected = self.selected.saturating_sub(1);
                self.table_state.select(Some(self.selected));
                None
            }
            TuiEvent::CursorDown => {
                if !self.rows.is_empty() {
                    self.selected = (self.selected + 1).min(self.rows.len() - 1);
                    self.table_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::InputChar('c') => match self.rows.get(self.selected) {
                Some((asset_id, true)) => Some(HistoryEvent::CheckIn(asset_id.clone())),
                _ => None,
            },
            TuiEvent::Escape | TuiEvent::InputChar('d') => Some(HistoryEvent::Back),
            TuiEvent::InputChar('q') => Some(HistoryEvent::Quit),
            _ => None,
        }
    }
}

pub struct History<'a> {
    state: &'a mut HistoryState,
    view: &'a HistoryView,
    date_format: &'a str,
}

impl<'a> History<'a> {
    pub fn new(state: &'a mut HistoryState, view: &'a HistoryView, date_format: &'a str) -> Self {
        Self {
            state,
            view,
            date_format,
        }
    }

    fn rental_row(&self, row: &HistoryRow) -> Row<'static> {
        let standing_style = match row.standing {
            RentalStanding::Active => Style::default().fg(Color::Yellow),
            RentalStanding::Overdue { .. } => Style::default().fg(Color::Red),
            RentalStanding::Returned => Style::default().fg(Color::Green),
            RentalStanding::ReturnedLate { .. } => Style::default().fg(Color::LightRed),
        };
        let rental = &row.rental;
        let returned = rental
            .returned_at
            .map(|at| format_local(at, self.date_format))
            .unwrap_or_else(|| "-".to_string());

        Row::new(vec![
            Cell::from(rental.id.clone()),
            Cell::from(row.asset_label.clone()),
            Cell::from(rental.customer.name.clone()),
            Cell::from(rental.site.clone()),
            Cell::from(format_local(rental.check_out_at, self.date_format)),
            Cell::from(format_local(rental.check_in_at, self.date_format)),
            Cell::from(returned),
            Cell::from(row.standing.label()).style(standing_style),
        ])
    }

    fn render_customers(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Customer reliability ");

        let rows: Vec<Row> = self
            .view
            .customers
            .iter()
            .take(CUSTOMER_PANEL_ROWS)
            .map(|c| {
                let style = if c.currently_overdue > 0 {
                    Style::default().fg(Color::Red)
                } else if c.late_returns > 0 {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::Gray)
                };
                Row::new(vec![
                    c.name.clone(),
                    format!("{} rentals", c.total_rentals),
                    format!("{} late", c.late_returns),
                    format!("{} overdue", c.currently_overdue),
                    format!("{:.0}% on time", c.reliability_pct),
                ])
                .style(style)
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Fill(1),
                Constraint::Length(11),
                Constraint::Length(8),
                Constraint::Length(11),
                Constraint::Length(13),
            ],
        )
        .block(block);
        frame.render_widget(table, area);
    }
}

impl Component for History<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.sync_rows(&self.view.rows);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Rental history ")
            .title_bottom(
                Line::from(" ↑/↓ Select  c Check in  Esc/d Dashboard  q Quit ").centered(),
            );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.view.rows.is_empty() {
            frame.render_widget(
                Paragraph::new("No rentals yet.")
                    .style(Style::default().fg(Color::DarkGray))
                    .centered(),
                inner,
            );
            return;
        }

        let customer_rows = self.view.customers.len().min(CUSTOMER_PANEL_ROWS) as u16;
        let [rentals_area, customers_area] = Layout::vertical([
            Constraint::Min(3),
            Constraint::Length(customer_rows + 1),
        ])
        .areas(inner);

        let header = Row::new(vec![
            "Rental", "Asset", "Customer", "Site", "Out", "Due", "Returned", "Standing",
        ])
        .style(Style::default().add_modifier(Modifier::BOLD));
        let rows: Vec<Row> = self.view.rows.iter().map(|r| self.rental_row(r)).collect();
        let widths = [
            Constraint::Length(10),
            Constraint::Fill(2),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Length(13),
            Constraint::Length(13),
            Constraint::Length(13),
            Constraint::Length(17),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(table, rentals_area, &mut self.state.table_state);

        self.render_customers(frame, customers_area);
    }
}
