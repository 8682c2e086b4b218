//! Device detail: identity, attributes and interfaces.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Table};
use throbber_widgets_tui::ThrobberState;

use nsot_core::store::selectors;
use nsot_core::{AppState, Device, DeviceForm, Interface, ResourceKind};

use crate::action::{Action, ConfirmDelete, FormSubmission};
use crate::component::Component;
use crate::theme;
use crate::views::{self, Listing};
use crate::widgets::loading;

pub struct DeviceDetailScreen {
    throbber: ThrobberState,
}

impl DeviceDetailScreen {
    pub fn new() -> Self {
        Self {
            throbber: ThrobberState::default(),
        }
    }

    fn render_device(
        &self,
        frame: &mut Frame,
        area: Rect,
        device: &Device,
        interfaces: &[&Interface],
        interfaces_loading: bool,
    ) {
        let mut lines = vec![
            views::field_line("ID", device.id.to_string()),
            views::field_line("Hostname", device.hostname.clone()),
            views::field_line(
                "Site",
                device.site_id.map_or_else(|| views::NONE.into(), |v| v.to_string()),
            ),
            Line::default(),
            Line::from(Span::styled("  Attributes", theme::title())),
        ];
        lines.extend(views::attribute_lines(&device.attributes));

        #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
        let fields_height = lines.len() as u16 + 1;
        let [fields, heading, table] = Layout::vertical([
            Constraint::Length(fields_height),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);

        frame.render_widget(Paragraph::new(lines), fields);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!("  Interfaces ({})", interfaces.len()),
                theme::title(),
            ))),
            heading,
        );

        if interfaces_loading {
            loading::render_loading(frame, table, "Loading...", &self.throbber);
        } else if interfaces.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  (no interfaces)", theme::muted())),
                table,
            );
        } else {
            let rows = interfaces.iter().map(|i| views::interface_row(i));
            frame.render_widget(
                Table::new(rows, views::interface_widths()).header(views::interface_header()),
                table,
            );
        }
    }
}

impl Component for DeviceDetailScreen {
    fn handle_key_event(&mut self, key: KeyEvent, state: &AppState) -> Result<Option<Action>> {
        let Some(id) = state.route().entity_id() else {
            return Ok(None);
        };
        let action = match key.code {
            KeyCode::Char('d') => selectors::item::<Device>(state, id).map(|device| {
                Action::RequestDelete(ConfirmDelete {
                    kind: ResourceKind::Device,
                    id,
                    label: device.label(),
                })
            }),
            KeyCode::Char('e') => selectors::item::<Device>(state, id).map(|device| {
                Action::OpenEdit(id, FormSubmission::Device(DeviceForm::from(device)))
            }),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
        Ok(action)
    }

    fn on_tick(&mut self) {
        self.throbber.calc_next();
    }

    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let Some(id) = state.route().entity_id() else {
            return;
        };
        let interfaces = selectors::device_interfaces(state, id);
        let interfaces_loading = state.interfaces.is_fetching;
        super::render_entity::<Device>(frame, area, state, &self.throbber, |frame, area, device| {
            self.render_device(frame, area, device, &interfaces, interfaces_loading);
        });
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[("e", "edit"), ("d", "delete"), ("r", "refresh"), ("Esc", "back")]
    }
}
