//! Network detail with its child networks.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Table, TableState};
use throbber_widgets_tui::ThrobberState;

use nsot_core::store::selectors;
use nsot_core::{AppState, EntityId, Network, NetworkForm, NetworkRelation, ResourceKind, Route};

use crate::action::{Action, ConfirmDelete, FormSubmission};
use crate::component::Component;
use crate::theme;
use crate::views::{self, Listing};
use crate::widgets::loading;

pub struct NetworkDetailScreen {
    children_state: TableState,
    throbber: ThrobberState,
}

fn children(state: &AppState, id: EntityId) -> &[Network] {
    selectors::related_networks(state, id, NetworkRelation::Children).unwrap_or_default()
}

impl NetworkDetailScreen {
    pub fn new() -> Self {
        Self {
            children_state: TableState::default().with_selected(Some(0)),
            throbber: ThrobberState::default(),
        }
    }

    fn render_network(&self, frame: &mut Frame, area: Rect, network: &Network, state: &AppState) {
        let optional = |v: Option<String>| v.unwrap_or_else(|| views::NONE.into());
        let mut lines = vec![
            views::field_line("ID", network.id.to_string()),
            views::field_line("CIDR", network.cidr()),
            views::field_line("State", optional(network.state.map(|v| v.to_string()))),
            views::field_line("Parent", optional(network.parent_id.map(|v| v.to_string()))),
            views::field_line("IP address", views::yes_no(network.is_ip)),
            views::field_line(
                "IP version",
                optional(network.ip_version.as_ref().map(|v| format!("IPv{v}"))),
            ),
            Line::default(),
            Line::from(Span::styled("  Attributes", theme::title())),
        ];
        lines.extend(views::attribute_lines(&network.attributes));

        #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
        let fields_height = lines.len() as u16 + 1;
        let [fields, heading, table] = Layout::vertical([
            Constraint::Length(fields_height),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);
        frame.render_widget(Paragraph::new(lines), fields);

        let related = &state.related;
        let kids = children(state, network.id);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!("  Children ({})", kids.len()),
                theme::title(),
            ))),
            heading,
        );

        if related.is_fetching {
            loading::render_loading(frame, table, "Loading...", &self.throbber);
        } else if let Some(error) = &related.error {
            frame.render_widget(Paragraph::new(views::error_line(error)), table);
        } else if kids.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  (no child networks)", theme::muted())),
                table,
            );
        } else {
            let widget = Table::new(kids.iter().map(|n| n.row()), Network::widths())
                .header(Network::header())
                .row_highlight_style(theme::selected())
                .highlight_symbol("▸ ");
            let mut children_state = self.children_state;
            frame.render_stateful_widget(widget, table, &mut children_state);
        }
    }

    fn select(&mut self, idx: usize, len: usize) {
        let idx = if len == 0 { 0 } else { idx.min(len - 1) };
        self.children_state.select(Some(idx));
    }
}

impl Component for NetworkDetailScreen {
    fn handle_key_event(&mut self, key: KeyEvent, state: &AppState) -> Result<Option<Action>> {
        let Some(id) = state.route().entity_id() else {
            return Ok(None);
        };
        let kids = children(state, id);
        let current = self.children_state.selected().unwrap_or(0);

        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.select(current + 1, kids.len());
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.select(current.saturating_sub(1), kids.len());
                None
            }
            KeyCode::Enter => kids
                .get(current)
                .map(|child| Action::Navigate(Route::Network(child.id))),
            KeyCode::Char('p') => selectors::item::<Network>(state, id)
                .and_then(|n| n.parent_id)
                .map(|parent| Action::Navigate(Route::Network(parent))),
            KeyCode::Char('d') => selectors::item::<Network>(state, id).map(|network| {
                Action::RequestDelete(ConfirmDelete {
                    kind: ResourceKind::Network,
                    id,
                    label: network.label(),
                })
            }),
            KeyCode::Char('e') => selectors::item::<Network>(state, id).map(|network| {
                Action::OpenEdit(id, FormSubmission::Network(NetworkForm::from(network)))
            }),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
        Ok(action)
    }

    fn on_state(&mut self, state: &AppState) {
        if let Some(id) = state.route().entity_id() {
            let len = children(state, id).len();
            let current = self.children_state.selected().unwrap_or(0);
            self.select(current, len);
        }
    }

    fn on_tick(&mut self) {
        self.throbber.calc_next();
    }

    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        super::render_entity::<Network>(frame, area, state, &self.throbber, |frame, area, network| {
            self.render_network(frame, area, network, state);
        });
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("↑↓", "child"),
            ("Enter", "open child"),
            ("p", "parent"),
            ("e", "edit"),
            ("d", "delete"),
            ("Esc", "back"),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::KeyModifiers;

    use nsot_core::{
        Action as StoreAction, Attributes, Reducer, RelatedAction, ResourceAction,
    };

    use super::*;

    fn network(id: u64, address: &str, prefix: u8, parent: Option<u64>) -> Network {
        Network {
            id: EntityId::new(id),
            network_address: address.into(),
            prefix_length: prefix,
            attributes: Attributes::new(),
            site_id: Some(EntityId::new(1)),
            state: None,
            parent_id: parent.map(EntityId::new),
            is_ip: false,
            ip_version: Some("4".into()),
        }
    }

    fn loaded() -> Arc<AppState> {
        let id = EntityId::new(2);
        let mut state = Arc::new(AppState::at(Route::Network(id)));
        for action in [
            StoreAction::Network(ResourceAction::GetSuccess(network(2, "10.0.0.0", 16, Some(1)))),
            StoreAction::Related(RelatedAction::Request {
                network_id: id,
                relation: NetworkRelation::Children,
            }),
            StoreAction::Related(RelatedAction::Success {
                network_id: id,
                relation: NetworkRelation::Children,
                networks: vec![
                    network(5, "10.0.1.0", 24, Some(2)),
                    network(6, "10.0.2.0", 24, Some(2)),
                ],
            }),
        ] {
            state = AppState::reduce(&state, &action);
        }
        state
    }

    fn press(screen: &mut NetworkDetailScreen, state: &AppState, code: KeyCode) -> Option<Action> {
        screen
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE), state)
            .unwrap()
    }

    #[test]
    fn enter_opens_the_selected_child() {
        let state = loaded();
        let mut screen = NetworkDetailScreen::new();
        press(&mut screen, &state, KeyCode::Down);
        let action = press(&mut screen, &state, KeyCode::Enter);
        assert!(matches!(
            action,
            Some(Action::Navigate(Route::Network(id))) if id == EntityId::new(6)
        ));
    }

    #[test]
    fn p_goes_to_the_parent() {
        let state = loaded();
        let mut screen = NetworkDetailScreen::new();
        let action = press(&mut screen, &state, KeyCode::Char('p'));
        assert!(matches!(
            action,
            Some(Action::Navigate(Route::Network(id))) if id == EntityId::new(1)
        ));
    }
}
