//! Attribute definition detail.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use throbber_widgets_tui::ThrobberState;

use nsot_core::store::selectors;
use nsot_core::{AppState, Attribute, AttributeForm, ResourceKind};

use crate::action::{Action, ConfirmDelete, FormSubmission};
use crate::component::Component;
use crate::theme;
use crate::views::{self, Listing};

pub struct AttributeDetailScreen {
    throbber: ThrobberState,
}

impl AttributeDetailScreen {
    pub fn new() -> Self {
        Self {
            throbber: ThrobberState::default(),
        }
    }
}

fn attribute_lines(attribute: &Attribute) -> Vec<Line<'static>> {
    let description = if attribute.description.is_empty() {
        views::NONE.to_owned()
    } else {
        attribute.description.clone()
    };
    let mut lines = vec![
        views::field_line("ID", attribute.id.to_string()),
        views::field_line("Name", attribute.name.clone()),
        views::field_line(
            "Resource",
            attribute
                .resource_name
                .map_or_else(|| views::NONE.into(), |v| v.to_string()),
        ),
        views::field_line("Description", description),
        views::field_line("Required", views::yes_no(attribute.required)),
        views::field_line("Display", views::yes_no(attribute.display)),
        views::field_line("Multi", views::yes_no(attribute.multi)),
    ];
    if let Some(constraints) = attribute.constraints.as_object().filter(|c| !c.is_empty()) {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("  Constraints", theme::title())));
        lines.extend(
            constraints
                .iter()
                .map(|(k, v)| views::field_line(k, views::value_text(v))),
        );
    }
    lines
}

impl Component for AttributeDetailScreen {
    fn handle_key_event(&mut self, key: KeyEvent, state: &AppState) -> Result<Option<Action>> {
        let Some(id) = state.route().entity_id() else {
            return Ok(None);
        };
        let action = match key.code {
            KeyCode::Char('d') => selectors::item::<Attribute>(state, id).map(|attribute| {
                Action::RequestDelete(ConfirmDelete {
                    kind: ResourceKind::Attribute,
                    id,
                    label: attribute.label(),
                })
            }),
            KeyCode::Char('e') => selectors::item::<Attribute>(state, id).map(|attribute| {
                Action::OpenEdit(id, FormSubmission::Attribute(AttributeForm::from(attribute)))
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
        super::render_entity::<Attribute>(frame, area, state, &self.throbber, |frame, area, attribute| {
            frame.render_widget(
                Paragraph::new(attribute_lines(attribute)).wrap(Wrap { trim: false }),
                area,
            );
        });
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[("e", "edit"), ("d", "delete"), ("r", "refresh"), ("Esc", "back")]
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use nsot_core::{EntityId, ResourceName};

    use super::*;

    #[test]
    fn constraints_are_listed_when_present() {
        let mut attribute = Attribute {
            id: EntityId::new(9),
            name: "role".into(),
            resource_name: Some(ResourceName::Device),
            description: String::new(),
            required: true,
            display: true,
            multi: false,
            constraints: json!({}),
            site_id: None,
        };
        assert_eq!(attribute_lines(&attribute).len(), 7);

        attribute.constraints = json!({ "pattern": "^(core|edge)$" });
        assert_eq!(attribute_lines(&attribute).len(), 10);
    }
}
