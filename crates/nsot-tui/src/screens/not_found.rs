use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::Paragraph;

use nsot_core::{AppState, Route};

use crate::component::Component;
use crate::theme;
use crate::views;

/// Shown for paths that match no route.
pub struct NotFoundScreen;

impl Component for NotFoundScreen {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let path = match state.route() {
            Route::NotFound(path) => path.clone(),
            other => other.path(),
        };
        let [_, row, hint, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);
        frame.render_widget(
            Paragraph::new(views::notice(format!("Nothing at {path}"), theme::error())),
            row,
        );
        frame.render_widget(
            Paragraph::new(views::notice("press 1 for home", theme::muted())),
            hint,
        );
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[("1", "home"), ("Esc", "back")]
    }
}
