//! Paginated table container, shared by every list route.

use std::marker::PhantomData;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Table, TableState};
use throbber_widgets_tui::ThrobberState;

use nsot_core::store::selectors;
use nsot_core::{AppState, PageRequest, Route};

use crate::action::{Action, ConfirmDelete};
use crate::component::Component;
use crate::theme;
use crate::views::{self, Listing};
use crate::widgets::loading;

pub struct ListScreen<T> {
    table_state: TableState,
    page_size: u64,
    throbber: ThrobberState,
    _kind: PhantomData<fn() -> T>,
}

impl<T: Listing> ListScreen<T> {
    pub fn new(page_size: u64) -> Self {
        Self {
            table_state: TableState::default().with_selected(Some(0)),
            page_size,
            throbber: ThrobberState::default(),
            _kind: PhantomData,
        }
    }

    fn selected<'a>(&self, state: &'a AppState) -> Option<&'a T> {
        selectors::slice::<T>(state)
            .items
            .get(self.table_state.selected().unwrap_or(0))
    }

    /// Page currently shown, or the first page before anything loaded.
    fn current_page(&self, state: &AppState) -> PageRequest {
        selectors::pagination::<T>(state).map_or_else(
            || PageRequest::first(self.page_size),
            |info| PageRequest {
                page: info.page(),
                limit: info.limit.unwrap_or(self.page_size),
            },
        )
    }

    fn select(&mut self, idx: usize, len: usize) {
        let idx = if len == 0 { 0 } else { idx.min(len - 1) };
        self.table_state.select(Some(idx));
    }
}

impl<T: Listing> Component for ListScreen<T> {
    fn handle_key_event(&mut self, key: KeyEvent, state: &AppState) -> Result<Option<Action>> {
        let len = selectors::slice::<T>(state).items.len();
        let current = self.table_state.selected().unwrap_or(0);

        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.select(current + 1, len);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.select(current.saturating_sub(1), len);
                None
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.select(0, len);
                None
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.select(len.saturating_sub(1), len);
                None
            }
            KeyCode::Enter => self
                .selected(state)
                .map(|item| Action::Navigate(Route::detail(T::KIND, item.id()))),
            KeyCode::Char('n') if !T::KIND.is_read_only() => Some(Action::OpenForm(T::KIND)),
            KeyCode::Char('d') if !T::KIND.is_read_only() => {
                self.selected(state).map(|item| {
                    Action::RequestDelete(ConfirmDelete {
                        kind: T::KIND,
                        id: item.id(),
                        label: item.label(),
                    })
                })
            }
            KeyCode::Char(']') | KeyCode::PageDown => {
                let total = selectors::pagination::<T>(state).map_or(0, |p| p.total_pages());
                let page = self.current_page(state);
                let next = page.next(total);
                (next != page).then_some(Action::ChangePage(T::KIND, next))
            }
            KeyCode::Char('[') | KeyCode::PageUp => {
                let page = self.current_page(state);
                let prev = page.prev();
                (prev != page).then_some(Action::ChangePage(T::KIND, prev))
            }
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
        Ok(action)
    }

    fn on_state(&mut self, state: &AppState) {
        let len = selectors::slice::<T>(state).items.len();
        let current = self.table_state.selected().unwrap_or(0);
        self.select(current, len);
    }

    fn on_tick(&mut self) {
        self.throbber.calc_next();
    }

    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let slice = selectors::slice::<T>(state);
        let total = selectors::total::<T>(state).unwrap_or(0);

        let block = Block::default()
            .title(format!(" {} ({total}) ", T::TITLE))
            .title_style(theme::title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [body, status, footer] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        if slice.is_fetching {
            loading::render_loading(frame, body, "Loading...", &self.throbber);
        } else if slice.items.is_empty() && slice.error.is_none() {
            frame.render_widget(
                Paragraph::new(views::notice(
                    format!("No {} yet", T::TITLE.to_lowercase()),
                    theme::muted(),
                )),
                body,
            );
        } else {
            let rows = slice.items.iter().map(|item| item.row());
            let table = Table::new(rows, T::widths())
                .header(T::header())
                .row_highlight_style(theme::selected())
                .highlight_symbol("▸ ");
            let mut table_state = self.table_state;
            frame.render_stateful_widget(table, body, &mut table_state);
        }

        if let Some(error) = &slice.error {
            frame.render_widget(Paragraph::new(views::error_line(error)), status);
        }
        frame.render_widget(
            Paragraph::new(views::pagination_footer(slice.pagination)),
            footer,
        );
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        if T::KIND.is_read_only() {
            &[("↑↓", "move"), ("Enter", "open"), ("[ ]", "page"), ("r", "refresh")]
        } else {
            &[
                ("↑↓", "move"),
                ("Enter", "open"),
                ("n", "new"),
                ("d", "delete"),
                ("[ ]", "page"),
                ("r", "refresh"),
            ]
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    use nsot_core::{
        Action as StoreAction, Attributes, Change, Device, EntityId, Page, PageInfo, Reducer,
        ResourceAction, ResourceKind,
    };

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn device(id: u64, hostname: &str) -> Device {
        Device {
            id: EntityId::new(id),
            hostname: hostname.into(),
            attributes: Attributes::new(),
            site_id: Some(EntityId::new(1)),
        }
    }

    fn with_devices(count: u64, offset: u64, items: Vec<Device>) -> AppState {
        let state = Arc::new(AppState::default());
        let next = AppState::reduce(
            &state,
            &StoreAction::Device(ResourceAction::ListSuccess(Page {
                items,
                info: PageInfo {
                    count,
                    limit: Some(10),
                    offset,
                },
            })),
        );
        (*next).clone()
    }

    #[test]
    fn enter_opens_the_selected_row() {
        let state = with_devices(2, 0, vec![device(1, "sw1"), device(2, "sw2")]);
        let mut screen = ListScreen::<Device>::new(10);
        screen.handle_key_event(key(KeyCode::Down), &state).unwrap();
        let action = screen.handle_key_event(key(KeyCode::Enter), &state).unwrap();
        assert!(matches!(
            action,
            Some(Action::Navigate(Route::Device(id))) if id == EntityId::new(2)
        ));
    }

    #[test]
    fn selection_stops_at_the_last_row() {
        let state = with_devices(2, 0, vec![device(1, "sw1"), device(2, "sw2")]);
        let mut screen = ListScreen::<Device>::new(10);
        for _ in 0..5 {
            screen.handle_key_event(key(KeyCode::Char('j')), &state).unwrap();
        }
        assert_eq!(screen.table_state.selected(), Some(1));
    }

    #[test]
    fn paging_follows_server_offsets() {
        let state = with_devices(21, 10, vec![device(11, "sw11")]);
        let mut screen = ListScreen::<Device>::new(10);

        let next = screen.handle_key_event(key(KeyCode::Char(']')), &state).unwrap();
        assert!(matches!(
            next,
            Some(Action::ChangePage(ResourceKind::Device, PageRequest { page: 2, limit: 10 }))
        ));
        let prev = screen.handle_key_event(key(KeyCode::Char('[')), &state).unwrap();
        assert!(matches!(
            prev,
            Some(Action::ChangePage(ResourceKind::Device, PageRequest { page: 0, limit: 10 }))
        ));
    }

    #[test]
    fn last_page_has_no_next() {
        let state = with_devices(21, 20, vec![device(21, "sw21")]);
        let mut screen = ListScreen::<Device>::new(10);
        let next = screen.handle_key_event(key(KeyCode::Char(']')), &state).unwrap();
        assert!(next.is_none());
    }

    #[test]
    fn delete_asks_for_confirmation_with_the_label() {
        let state = with_devices(1, 0, vec![device(4, "edge1")]);
        let mut screen = ListScreen::<Device>::new(10);
        let action = screen.handle_key_event(key(KeyCode::Char('d')), &state).unwrap();
        let Some(Action::RequestDelete(confirm)) = action else {
            panic!("expected delete request");
        };
        assert_eq!(confirm.to_string(), "Delete device edge1?");
    }

    #[test]
    fn changes_cannot_be_created_or_deleted() {
        let state = AppState::default();
        let mut screen = ListScreen::<Change>::new(10);
        assert!(screen.handle_key_event(key(KeyCode::Char('n')), &state).unwrap().is_none());
        assert!(screen.handle_key_event(key(KeyCode::Char('d')), &state).unwrap().is_none());
    }
}
