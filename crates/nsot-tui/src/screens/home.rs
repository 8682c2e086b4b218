//! Home screen: one count card per resource list.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use throbber_widgets_tui::ThrobberState;

use nsot_core::store::selectors;
use nsot_core::{AppState, Attribute, Change, Device, Network, Resource, ResourceKind, Route};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::loading;

const CARDS: [ResourceKind; 4] = [
    ResourceKind::Device,
    ResourceKind::Network,
    ResourceKind::Attribute,
    ResourceKind::Change,
];

pub struct HomeScreen {
    selected: usize,
    throbber: ThrobberState,
}

/// Total and loading flag for one card.
fn card_stats<T: Resource>(state: &AppState) -> (Option<u64>, bool) {
    (
        selectors::total::<T>(state),
        selectors::slice::<T>(state).is_fetching,
    )
}

fn stats_for(kind: ResourceKind, state: &AppState) -> (Option<u64>, bool) {
    match kind {
        ResourceKind::Device => card_stats::<Device>(state),
        ResourceKind::Network => card_stats::<Network>(state),
        ResourceKind::Attribute => card_stats::<Attribute>(state),
        ResourceKind::Change => card_stats::<Change>(state),
        ResourceKind::Interface => (None, false),
    }
}

fn card_title(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Device => "Devices",
        ResourceKind::Network => "Networks",
        ResourceKind::Attribute => "Attributes",
        ResourceKind::Change => "Changes",
        ResourceKind::Interface => "Interfaces",
    }
}

impl HomeScreen {
    pub fn new() -> Self {
        Self {
            selected: 0,
            throbber: ThrobberState::default(),
        }
    }

    fn render_card(&self, frame: &mut Frame, area: Rect, kind: ResourceKind, state: &AppState) {
        let active = CARDS.get(self.selected) == Some(&kind);
        let block = Block::default()
            .title(format!(" {} ", card_title(kind)))
            .title_style(theme::title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if active {
                theme::border_active()
            } else {
                theme::border()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match stats_for(kind, state) {
            (_, true) => loading::render_loading(frame, inner, "Loading...", &self.throbber),
            (total, false) => {
                let count = total.map_or_else(|| "─".to_owned(), |v| v.to_string());
                let [_, row, _] = Layout::vertical([
                    Constraint::Fill(1),
                    Constraint::Length(1),
                    Constraint::Fill(1),
                ])
                .areas(inner);
                frame.render_widget(
                    Paragraph::new(Line::from(Span::styled(count, theme::value())).centered()),
                    row,
                );
            }
        }
    }
}

impl Component for HomeScreen {
    fn handle_key_event(&mut self, key: KeyEvent, _state: &AppState) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => {
                self.selected = (self.selected + 1) % CARDS.len();
                None
            }
            KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => {
                self.selected = (self.selected + CARDS.len() - 1) % CARDS.len();
                None
            }
            KeyCode::Enter => CARDS
                .get(self.selected)
                .map(|kind| Action::Navigate(Route::list(*kind))),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
        Ok(action)
    }

    fn on_tick(&mut self) {
        self.throbber.calc_next();
    }

    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let [header, cards, _] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(7),
            Constraint::Fill(1),
        ])
        .areas(area);

        let site = state
            .ui
            .site
            .as_ref()
            .map_or_else(|| "─".to_owned(), |s| s.name.clone());
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled("  Network Source of Truth", theme::title())),
                Line::from(vec![
                    Span::styled("  site ", theme::muted()),
                    Span::styled(site, theme::value()),
                ]),
            ]),
            header,
        );

        let columns = Layout::horizontal([Constraint::Fill(1); 4]).split(cards);
        for (kind, area) in CARDS.iter().zip(columns.iter()) {
            self.render_card(frame, *area, *kind, state);
        }
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[("←→", "select"), ("Enter", "open"), ("r", "refresh")]
    }
}
