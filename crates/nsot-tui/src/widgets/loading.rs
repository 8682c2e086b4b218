//! "Loading..." placeholder shown while a loading flag is set.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use throbber_widgets_tui::{Throbber, ThrobberState};

use crate::theme;

pub fn render_loading(frame: &mut Frame, area: Rect, label: &str, state: &ThrobberState) {
    let [_, row, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(area);

    let throbber = Throbber::default()
        .label(format!("  {label}"))
        .style(Style::default().fg(theme::TEXT))
        .throbber_style(Style::default().fg(theme::ACCENT_ALT));

    frame.render_stateful_widget(throbber, row, &mut state.clone());
}
