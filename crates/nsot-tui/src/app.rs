//! Application core: event loop, routing to containers, overlays.
//!
//! The app never mutates domain data. Keys become [`Action`]s; actions
//! that touch the server are spawned as [`Controller`] calls, whose
//! dispatches come back as [`Action::StateChanged`] snapshots through the
//! state bridge.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use nsot_core::command;
use nsot_core::store::selectors;
use nsot_core::{
    Action as StoreAction, AppState, Attribute, Change, Command, ConnectionState, Controller,
    Device, Network, NetworkRelation, Notification, NotificationLevel, PageRequest, Resource,
    ResourceKind, Route, UiAction,
};

use crate::action::{Action, ConfirmDelete, FormSubmission};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screens::{ScreenId, create_screens};
use crate::state_bridge::run_state_bridge;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::confirm::render_confirm;
use crate::widgets::form::FormDialog;
use crate::widgets::popup;

/// How long a toast stays up before it is dismissed.
const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

const GLOBAL_KEYS: &[(&str, &str)] = &[
    ("1-5", "switch tab"),
    ("Esc", "back"),
    ("x", "dismiss message"),
    ("?", "toggle help"),
    ("q", "quit"),
];

pub struct App {
    controller: Controller,
    start: Route,
    state: Arc<AppState>,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    connection: ConnectionState,
    help_visible: bool,
    form: Option<FormDialog>,
    pending_confirm: Option<ConfirmDelete>,
    /// The toast on screen and when it first appeared.
    notification: Option<(Notification, Instant)>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    bridge_cancel: CancellationToken,
}

impl App {
    pub fn new(controller: Controller, start: Route) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens = create_screens(controller.config().page_size);
        let state = controller.store().state();
        Self {
            controller,
            start,
            state,
            screens,
            running: true,
            connection: ConnectionState::Connecting,
            help_visible: false,
            form: None,
            pending_confirm: None,
            notification: None,
            action_tx,
            action_rx,
            bridge_cancel: CancellationToken::new(),
        }
    }

    fn active_screen(&self) -> ScreenId {
        ScreenId::for_route(self.state.route())
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        tokio::spawn(run_state_bridge(
            self.controller.clone(),
            self.start.clone(),
            self.action_tx.clone(),
            self.bridge_cancel.clone(),
        ));

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!(start = %self.start, "console event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Paste(text) => {
                    if let Some(form) = self.form.as_mut() {
                        form.paste(&text);
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                let render = matches!(action, Action::Render);
                self.process_action(action);
                if render {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.bridge_cancel.cancel();
        events.stop();
        info!("console event loop ended");
        Ok(())
    }

    /// Map a key to an action. Overlays capture input before global keys,
    /// and global keys before the active container.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.pending_confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        if let Some(form) = self.form.as_mut() {
            return Ok(form.handle_key_event(key));
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?' | 'q') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        match key.code {
            KeyCode::Char('q') => return Ok(Some(Action::Quit)),
            KeyCode::Char('?') => return Ok(Some(Action::ToggleHelp)),
            KeyCode::Char('x') => return Ok(Some(Action::DismissNotification)),
            KeyCode::Esc | KeyCode::Backspace => return Ok(Some(Action::GoBack)),
            KeyCode::Char(c @ '1'..='5') => {
                let n = u8::try_from(c).map_or(0, |b| b - b'0');
                return Ok(ScreenId::tab_route(n).map(Action::Navigate));
            }
            _ => {}
        }

        let active = self.active_screen();
        match self.screens.get_mut(&active) {
            Some(screen) => screen.handle_key_event(key, &self.state),
            None => Ok(None),
        }
    }

    fn process_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Render => {}
            Action::Resize(w, h) => debug!(w, h, "terminal resized"),
            Action::Tick => self.on_tick(),

            Action::StateChanged(state) => self.on_state(state),
            Action::Connection(connection) => {
                if let ConnectionState::Failed(reason) = &connection {
                    self.notification = Some((
                        Notification {
                            level: NotificationLevel::Error,
                            message: format!("Connection failed: {reason}"),
                        },
                        Instant::now(),
                    ));
                }
                self.connection = connection;
            }

            Action::Navigate(route) => {
                let controller = self.controller.clone();
                tokio::spawn(async move {
                    if let Err(e) = controller.navigate(route).await {
                        warn!(error = %e, "navigation fetch failed");
                    }
                });
            }
            Action::GoBack => self.go_back(),
            Action::Refresh => {
                let page_size = self.controller.config().page_size;
                self.spawn_commands(refresh_commands(&self.state, page_size));
            }
            Action::ChangePage(kind, page) => {
                if let Some(cmd) = page_command(kind, page) {
                    self.spawn_commands(vec![cmd]);
                }
            }

            Action::OpenForm(kind) => {
                self.form = FormDialog::new(kind);
            }
            Action::OpenEdit(id, prefill) => {
                self.form = Some(FormDialog::edit(id, &prefill));
            }
            Action::CloseForm => {
                if self.form.as_mut().is_some_and(FormDialog::close) {
                    self.form = None;
                }
            }
            Action::SubmitForm(submission) => self.submit(submission),
            Action::FormFinished(outcome) => self.finish_form(outcome),

            Action::RequestDelete(confirm) => self.pending_confirm = Some(confirm),
            Action::ConfirmYes => {
                if let Some(confirm) = self.pending_confirm.take() {
                    let controller = self.controller.clone();
                    tokio::spawn(async move {
                        if let Err(e) = controller.delete(confirm.kind, confirm.id).await {
                            warn!(error = %e, kind = %confirm.kind, id = %confirm.id, "delete failed");
                        }
                    });
                }
            }
            Action::ConfirmNo => self.pending_confirm = None,

            Action::ToggleHelp => self.help_visible = !self.help_visible,
            Action::DismissNotification => {
                self.controller
                    .store()
                    .dispatch(StoreAction::Ui(UiAction::DismissNotification));
                self.notification = None;
            }
        }
    }

    fn on_state(&mut self, state: Arc<AppState>) {
        let incoming = state.ui.notification.clone();
        let current = self.notification.as_ref().map(|(n, _)| n);
        if incoming.as_ref() != current {
            self.notification = incoming.map(|n| (n, Instant::now()));
        }
        for screen in self.screens.values_mut() {
            screen.on_state(&state);
        }
        self.state = state;
    }

    fn on_tick(&mut self) {
        let active = self.active_screen();
        if let Some(screen) = self.screens.get_mut(&active) {
            screen.on_tick();
        }
        if let Some(form) = self.form.as_mut() {
            form.on_tick();
        }
        if self
            .notification
            .as_ref()
            .is_some_and(|(_, shown)| shown.elapsed() >= NOTIFICATION_TTL)
        {
            let _ = self.action_tx.send(Action::DismissNotification);
        }
    }

    /// Back through history; a detail screen opened directly falls back to
    /// its list.
    fn go_back(&self) {
        let controller = self.controller.clone();
        let route = self.state.route().clone();
        let can_go_back = self.state.location.can_go_back();
        tokio::spawn(async move {
            let result = if can_go_back {
                controller.go_back().await
            } else if route.is_detail() {
                controller.navigate(route.parent()).await
            } else {
                Ok(())
            };
            if let Err(e) = result {
                warn!(error = %e, "back navigation fetch failed");
            }
        });
    }

    fn spawn_commands(&self, commands: Vec<Command>) {
        for cmd in commands {
            let controller = self.controller.clone();
            tokio::spawn(async move {
                if let Err(e) = controller.execute(cmd).await {
                    warn!(error = %e, "fetch failed");
                }
            });
        }
    }

    fn submit(&mut self, submission: FormSubmission) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        if !form.begin_submit() {
            return;
        }
        let target = form.target();
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = match (&submission, target) {
                (FormSubmission::Device(form), None) => controller.submit_device(form).await,
                (FormSubmission::Device(form), Some(id)) => {
                    controller.update_device(id, form).await
                }
                (FormSubmission::Network(form), None) => controller.submit_network(form).await,
                (FormSubmission::Network(form), Some(id)) => {
                    controller.update_network(id, form).await
                }
                (FormSubmission::Attribute(form), None) => {
                    controller.submit_attribute(form).await
                }
                (FormSubmission::Attribute(form), Some(id)) => {
                    controller.update_attribute(id, form).await
                }
            };
            let outcome = result.map_err(|e| {
                warn!(error = %e, ?target, "save failed");
                Some(e.message().unwrap_or_else(|| format!("Could not save: {e}")))
            });
            let _ = tx.send(Action::FormFinished(outcome));
        });
    }

    fn finish_form(&mut self, outcome: Result<nsot_core::EntityId, Option<String>>) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let kind = form.kind();
        let created = outcome
            .as_ref()
            .ok()
            .copied()
            .filter(|_| form.target().is_none());
        if form.finish(outcome.map(|_| ())) {
            self.form = None;
        }
        // The controller already moved to the new detail route; load the
        // rest of what that screen shows.
        if let Some(id) = created {
            let controller = self.controller.clone();
            tokio::spawn(async move {
                if let Err(e) = controller.mount(&Route::detail(kind, id)).await {
                    debug!(error = %e, "mount after create failed");
                }
            });
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let [content, tabs, status] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let active = self.active_screen();
        if let Some(screen) = self.screens.get(&active) {
            screen.render(frame, content, &self.state);
        }
        self.render_tab_bar(frame, tabs, active);
        self.render_status_bar(frame, status, active);

        if let Some((notification, _)) = &self.notification {
            render_notification(frame, area, notification);
        }
        if let Some(form) = &self.form {
            form.render(frame, area);
        }
        if let Some(confirm) = &self.pending_confirm {
            render_confirm(frame, area, confirm);
        }
        if self.help_visible {
            self.render_help_overlay(frame, area, active);
        }
    }

    #[allow(clippy::unused_self)]
    fn render_tab_bar(&self, frame: &mut Frame, area: Rect, active: ScreenId) {
        let titles: Vec<Line> = ScreenId::TABS
            .iter()
            .enumerate()
            .map(|(i, id)| Line::from(format!(" {} {} ", i + 1, id.label())))
            .collect();
        let selected = ScreenId::TABS
            .iter()
            .position(|&id| id == active.tab())
            .unwrap_or(0);
        let tabs = Tabs::new(titles)
            .style(theme::muted())
            .highlight_style(theme::selected())
            .divider(Span::styled("│", theme::border()))
            .select(selected);
        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect, active: ScreenId) {
        let connection = match &self.connection {
            ConnectionState::Connected => Span::styled("● connected", Style::default().fg(theme::OK)),
            ConnectionState::Connecting => {
                Span::styled("◐ connecting", Style::default().fg(theme::WARN))
            }
            ConnectionState::Disconnected => {
                Span::styled("○ disconnected", Style::default().fg(theme::MUTED))
            }
            ConnectionState::Failed(_) => {
                Span::styled("✗ offline", Style::default().fg(theme::ERROR))
            }
        };

        let mut spans = vec![Span::raw(" "), connection];
        if let Some(user) = &self.state.ui.user {
            spans.push(Span::styled(format!("  {}", user.email), theme::text()));
        }
        if let Some(site) = &self.state.ui.site {
            spans.push(Span::styled(format!(" @ {}", site.name), theme::muted()));
        }
        spans.push(Span::styled(format!("  {}", self.state.route()), theme::muted()));
        spans.push(Span::styled(" │", theme::border()));

        let hints = self
            .screens
            .get(&active)
            .map(|s| s.hints())
            .unwrap_or_default();
        for (key, desc) in hints.iter().chain([("?", "help"), ("q", "quit")].iter()) {
            spans.push(Span::styled(format!(" {key} "), theme::key_hint_key()));
            spans.push(Span::styled(*desc, theme::key_hint()));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_help_overlay(&self, frame: &mut Frame, area: Rect, active: ScreenId) {
        let hints = self
            .screens
            .get(&active)
            .map(|s| s.hints())
            .unwrap_or_default();

        let mut lines = vec![Line::from(Span::styled(" Global", theme::title()))];
        lines.extend(GLOBAL_KEYS.iter().map(|(k, d)| help_line(k, d)));
        if !hints.is_empty() {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(format!(" {active}"), theme::title())));
            lines.extend(hints.iter().map(|(k, d)| help_line(k, d)));
        }

        #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
        let height = lines.len() as u16 + 2;
        let dialog = popup::centered(area, 48, height);
        let inner = popup::panel(frame, dialog, "Keys", theme::border_active());
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn help_line(key: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {key:<8}"), theme::key_hint_key()),
        Span::styled(desc.to_owned(), theme::key_hint()),
    ])
}

fn render_notification(frame: &mut Frame, area: Rect, notification: &Notification) {
    let (color, icon) = match notification.level {
        NotificationLevel::Info => (theme::OK, "✓"),
        NotificationLevel::Error => (theme::ERROR, "✗"),
    };

    let len = u16::try_from(notification.message.chars().count()).unwrap_or(u16::MAX);
    let width = len.saturating_add(6).clamp(20, 60).min(area.width);
    let height = 3u16;
    let x = area.width.saturating_sub(width + 1);
    let y = area.height.saturating_sub(height + 2);
    let toast = Rect::new(area.x + x, area.y + y, width, height);

    frame.render_widget(ratatui::widgets::Clear, toast);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(theme::BG_PANEL));
    let inner = block.inner(toast);
    frame.render_widget(block, toast);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(color)),
            Span::styled(notification.message.clone(), theme::text()),
        ])),
        inner,
    );
}

/// The page of `T` currently held, or the first one.
fn current_page<T: Resource>(state: &AppState, page_size: u64) -> PageRequest {
    selectors::pagination::<T>(state).map_or_else(
        || PageRequest::first(page_size),
        |info| PageRequest {
            page: info.page(),
            limit: info.limit.unwrap_or(page_size),
        },
    )
}

fn page_command(kind: ResourceKind, page: PageRequest) -> Option<Command> {
    match kind {
        ResourceKind::Device => Some(Device::fetch(page)),
        ResourceKind::Network => Some(Network::fetch(page)),
        ResourceKind::Attribute => Some(Attribute::fetch(page)),
        ResourceKind::Change => Some(Change::fetch(page)),
        ResourceKind::Interface => None,
    }
}

/// Everything the current route shows, refetched regardless of cache.
fn refresh_commands(state: &AppState, page_size: u64) -> Vec<Command> {
    match state.route() {
        Route::Home => vec![
            Device::fetch(current_page::<Device>(state, page_size)),
            Network::fetch(current_page::<Network>(state, page_size)),
            Attribute::fetch(current_page::<Attribute>(state, page_size)),
            Change::fetch(current_page::<Change>(state, page_size)),
        ],
        Route::Devices => vec![Device::fetch(current_page::<Device>(state, page_size))],
        Route::Networks => vec![Network::fetch(current_page::<Network>(state, page_size))],
        Route::Attributes => vec![Attribute::fetch(current_page::<Attribute>(state, page_size))],
        Route::Changes => vec![Change::fetch(current_page::<Change>(state, page_size))],
        Route::Device(id) => vec![Device::get(*id), command::fetch_device_interfaces(*id)],
        Route::Network(id) => vec![
            Network::get(*id),
            command::fetch_related_networks(*id, NetworkRelation::Children),
        ],
        Route::Attribute(id) => vec![Attribute::get(*id)],
        Route::Change(id) => vec![Change::get(*id)],
        Route::NotFound(_) => Vec::new(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use nsot_core::{EntityId, Page, PageInfo, Reducer, ResourceAction};

    use super::*;

    #[test]
    fn refresh_reloads_the_page_on_screen() {
        let state = Arc::new(AppState::at(Route::Devices));
        let state = AppState::reduce(
            &state,
            &StoreAction::Device(ResourceAction::ListSuccess(Page {
                items: Vec::new(),
                info: PageInfo {
                    count: 30,
                    limit: Some(10),
                    offset: 20,
                },
            })),
        );
        let commands = refresh_commands(&state, 25);
        assert_eq!(commands.len(), 1);
        let Command::FetchDevices(params) = &commands[0] else {
            panic!("expected a device page fetch");
        };
        assert_eq!(params.page, PageRequest { page: 2, limit: 10 });
        assert_eq!(params.page.offset(), 20);
    }

    #[test]
    fn refresh_on_detail_reloads_entity_and_related() {
        let state = AppState::at(Route::Network(EntityId::new(4)));
        let commands = refresh_commands(&state, 25);
        assert!(matches!(commands[0], Command::GetNetwork(id) if id == EntityId::new(4)));
        assert!(matches!(
            commands[1],
            Command::FetchRelatedNetworks { relation: NetworkRelation::Children, .. }
        ));
    }

    #[test]
    fn unknown_routes_have_nothing_to_refresh() {
        let state = AppState::at(Route::NotFound("/nope".into()));
        assert!(refresh_commands(&state, 25).is_empty());
    }

    #[test]
    fn interfaces_have_no_pages_of_their_own() {
        assert!(page_command(ResourceKind::Interface, PageRequest::first(10)).is_none());
        assert!(page_command(ResourceKind::Change, PageRequest::first(10)).is_some());
    }
}
