//! Change log entry: who, when, and the field diff.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use throbber_widgets_tui::ThrobberState;

use nsot_core::store::selectors;
use nsot_core::{AppState, Change, ChangeEvent, Route};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::views;

pub struct ChangeDetailScreen {
    throbber: ThrobberState,
}

impl ChangeDetailScreen {
    pub fn new() -> Self {
        Self {
            throbber: ThrobberState::default(),
        }
    }
}

/// Route of the changed record, if it still exists and has a screen.
fn resource_route(change: &Change) -> Option<Route> {
    if change.event == Some(ChangeEvent::Delete) {
        return None;
    }
    let route = Route::parse(&format!(
        "/{}s/{}",
        change.resource_name.to_lowercase(),
        change.resource_id
    ));
    route.is_detail().then_some(route)
}

fn change_lines(change: &Change) -> Vec<Line<'static>> {
    let mut lines = vec![
        views::field_line("ID", change.id.to_string()),
        views::field_line(
            "When",
            change.change_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ),
        views::field_line(
            "Event",
            change.event.map_or_else(|| views::NONE.into(), |v| v.to_string()),
        ),
        views::field_line(
            "Resource",
            format!("{} {}", change.resource_name, change.resource_id),
        ),
        views::field_line("User", change.user.email.clone()),
        Line::default(),
        Line::from(Span::styled("  Diff", theme::title())),
    ];
    lines.extend(views::diff_lines(&change.diff));
    lines
}

impl Component for ChangeDetailScreen {
    fn handle_key_event(&mut self, key: KeyEvent, state: &AppState) -> Result<Option<Action>> {
        let Some(id) = state.route().entity_id() else {
            return Ok(None);
        };
        let action = match key.code {
            KeyCode::Enter => selectors::item::<Change>(state, id)
                .and_then(resource_route)
                .map(Action::Navigate),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
        Ok(action)
    }

    fn on_tick(&mut self) {
        self.throbber.calc_next();
    }

    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        super::render_entity::<Change>(frame, area, state, &self.throbber, |frame, area, change| {
            frame.render_widget(
                Paragraph::new(change_lines(change)).wrap(Wrap { trim: false }),
                area,
            );
        });
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[("Enter", "open resource"), ("r", "refresh"), ("Esc", "back")]
    }
}
