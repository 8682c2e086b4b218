//! Create and edit dialog for devices, networks and attributes.
//!
//! Text fields are `tui_input::Input`s. Fields an existing record cannot
//! change (a network's CIDR, an attribute's name and resource type) are
//! shown locked in the edit variant. The dialog's submit cycle is a
//! [`DialogPhase`]: while a request is in flight every key except quit is
//! swallowed, and a failed submission reopens the dialog with the
//! server's message.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use throbber_widgets_tui::ThrobberState;
use tui_input::{Input, InputRequest};

use nsot_core::{
    AttributeForm, DeviceForm, DialogPhase, EntityId, NetworkForm, ResourceKind, ResourceName,
};

use crate::action::{Action, FormSubmission};
use crate::theme;
use crate::widgets::{loading, popup};

const RESOURCE_NAMES: [ResourceName; 4] = [
    ResourceName::Device,
    ResourceName::Network,
    ResourceName::Interface,
    ResourceName::Circuit,
];

#[derive(Debug)]
enum FieldValue {
    Text(Input),
    Toggle(bool),
    /// Index into [`RESOURCE_NAMES`].
    Choice(usize),
}

#[derive(Debug)]
struct Field {
    label: &'static str,
    hint: &'static str,
    value: FieldValue,
    locked: bool,
}

impl Field {
    fn text(label: &'static str, hint: &'static str) -> Self {
        Self::text_with(label, hint, "")
    }

    fn text_with(label: &'static str, hint: &'static str, value: &str) -> Self {
        Self {
            label,
            hint,
            value: FieldValue::Text(Input::new(value.to_owned())),
            locked: false,
        }
    }

    fn toggle(label: &'static str, on: bool) -> Self {
        Self {
            label,
            hint: "space toggles",
            value: FieldValue::Toggle(on),
            locked: false,
        }
    }

    fn choice(idx: usize) -> Self {
        Self {
            label: "Resource",
            hint: "←/→ to choose",
            value: FieldValue::Choice(idx),
            locked: false,
        }
    }

    #[must_use]
    fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    fn text_value(&self) -> String {
        match &self.value {
            FieldValue::Text(input) => input.value().to_owned(),
            FieldValue::Toggle(on) => on.to_string(),
            FieldValue::Choice(idx) => RESOURCE_NAMES
                .get(*idx)
                .map(ToString::to_string)
                .unwrap_or_default(),
        }
    }

    fn flag(&self) -> bool {
        matches!(self.value, FieldValue::Toggle(true))
    }
}

/// Attribute pairs are typed on one line separated by `;` and handed to
/// the form as `key=value` lines.
fn attribute_lines(raw: &str) -> String {
    raw.split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Inverse of [`attribute_lines`], for pre-filling an edit.
fn attribute_inline(lines: &str) -> String {
    lines.lines().collect::<Vec<_>>().join("; ")
}

const ATTRIBUTES_HINT: &str = "key=value; key=value";

#[derive(Debug)]
pub struct FormDialog {
    kind: ResourceKind,
    /// The record being edited; `None` for a create.
    target: Option<EntityId>,
    fields: Vec<Field>,
    active: usize,
    phase: DialogPhase,
    throbber: ThrobberState,
}

impl FormDialog {
    /// `None` for kinds that have no create form.
    pub fn new(kind: ResourceKind) -> Option<Self> {
        let fields = match kind {
            ResourceKind::Device => vec![
                Field::text("Hostname", "required"),
                Field::text("Attributes", ATTRIBUTES_HINT),
            ],
            ResourceKind::Network => vec![
                Field::text("CIDR", "e.g. 10.0.0.0/24"),
                Field::text("Attributes", ATTRIBUTES_HINT),
            ],
            ResourceKind::Attribute => vec![
                Field::text("Name", "required"),
                Field::choice(0),
                Field::text("Description", ""),
                Field::toggle("Required", false),
                Field::toggle("Display", true),
                Field::toggle("Multi", false),
            ],
            ResourceKind::Change | ResourceKind::Interface => return None,
        };
        Some(Self::build(kind, None, fields))
    }

    /// Edit dialog for record `id`, pre-filled from its current values.
    pub fn edit(id: EntityId, prefill: &FormSubmission) -> Self {
        let (kind, fields) = match prefill {
            FormSubmission::Device(form) => {
                let attributes = attribute_inline(&form.attributes);
                (
                    ResourceKind::Device,
                    vec![
                        Field::text_with("Hostname", "required", &form.hostname),
                        Field::text_with("Attributes", ATTRIBUTES_HINT, &attributes),
                    ],
                )
            }
            FormSubmission::Network(form) => {
                let attributes = attribute_inline(&form.attributes);
                (
                    ResourceKind::Network,
                    vec![
                        Field::text_with("CIDR", "", &form.cidr).locked(),
                        Field::text_with("Attributes", ATTRIBUTES_HINT, &attributes),
                    ],
                )
            }
            FormSubmission::Attribute(form) => {
                let resource = RESOURCE_NAMES
                    .iter()
                    .position(|r| r.to_string() == form.resource_name)
                    .unwrap_or(0);
                (
                    ResourceKind::Attribute,
                    vec![
                        Field::text_with("Name", "", &form.name).locked(),
                        Field::choice(resource).locked(),
                        Field::text_with("Description", "", &form.description),
                        Field::toggle("Required", form.required),
                        Field::toggle("Display", form.display),
                        Field::toggle("Multi", form.multi),
                    ],
                )
            }
        };
        Self::build(kind, Some(id), fields)
    }

    fn build(kind: ResourceKind, target: Option<EntityId>, fields: Vec<Field>) -> Self {
        let active = fields.iter().position(|f| !f.locked).unwrap_or(0);
        Self {
            kind,
            target,
            fields,
            active,
            phase: DialogPhase::open(),
            throbber: ThrobberState::default(),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    /// Lock input for a submission. `false` if one is already in flight.
    pub fn begin_submit(&mut self) -> bool {
        self.phase.begin_submit()
    }

    /// Apply a submission outcome; returns whether the dialog closed.
    pub fn finish(&mut self, outcome: Result<(), Option<String>>) -> bool {
        self.phase.finish(outcome);
        !self.phase.is_open()
    }

    /// Close unless a submission is in flight; returns whether it closed.
    pub fn close(&mut self) -> bool {
        self.phase.close();
        !self.phase.is_open()
    }

    pub fn on_tick(&mut self) {
        if self.phase.is_submitting() {
            self.throbber.calc_next();
        }
    }

    fn field(&self, idx: usize) -> String {
        self.fields.get(idx).map(Field::text_value).unwrap_or_default()
    }

    fn flag(&self, idx: usize) -> bool {
        self.fields.get(idx).is_some_and(Field::flag)
    }

    /// Current field values as a form payload.
    pub fn submission(&self) -> FormSubmission {
        match self.kind {
            ResourceKind::Network => FormSubmission::Network(NetworkForm {
                cidr: self.field(0),
                attributes: attribute_lines(&self.field(1)),
            }),
            ResourceKind::Attribute => FormSubmission::Attribute(AttributeForm {
                name: self.field(0),
                resource_name: self.field(1),
                description: self.field(2),
                required: self.flag(3),
                display: self.flag(4),
                multi: self.flag(5),
            }),
            _ => FormSubmission::Device(DeviceForm {
                hostname: self.field(0),
                attributes: attribute_lines(&self.field(1)),
            }),
        }
    }

    pub fn paste(&mut self, text: &str) {
        if self.phase.is_submitting() {
            return;
        }
        if let Some(FieldValue::Text(input)) = self.fields.get_mut(self.active).map(|f| &mut f.value) {
            for ch in text.chars().filter(|c| !c.is_control()) {
                input.handle(InputRequest::InsertChar(ch));
            }
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        if self.phase.is_submitting() {
            return None;
        }

        match key.code {
            KeyCode::Esc => return Some(Action::CloseForm),
            KeyCode::Enter => return Some(Action::SubmitForm(self.submission())),
            KeyCode::Tab | KeyCode::Down => {
                self.active = (self.active + 1) % self.fields.len();
                return None;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.active = (self.active + self.fields.len() - 1) % self.fields.len();
                return None;
            }
            _ => {}
        }

        let field = self.fields.get_mut(self.active).filter(|f| !f.locked)?;
        match (&mut field.value, key.code) {
            (FieldValue::Toggle(on), KeyCode::Char(' ')) => *on = !*on,
            (FieldValue::Choice(idx), KeyCode::Right | KeyCode::Char(' ')) => {
                *idx = (*idx + 1) % RESOURCE_NAMES.len();
            }
            (FieldValue::Choice(idx), KeyCode::Left) => {
                *idx = (*idx + RESOURCE_NAMES.len() - 1) % RESOURCE_NAMES.len();
            }
            (FieldValue::Text(input), code) => {
                let request = match code {
                    KeyCode::Char(ch) => Some(InputRequest::InsertChar(ch)),
                    KeyCode::Backspace => Some(InputRequest::DeletePrevChar),
                    KeyCode::Delete => Some(InputRequest::DeleteNextChar),
                    KeyCode::Left => Some(InputRequest::GoToPrevChar),
                    KeyCode::Right => Some(InputRequest::GoToNextChar),
                    KeyCode::Home => Some(InputRequest::GoToStart),
                    KeyCode::End => Some(InputRequest::GoToEnd),
                    _ => None,
                };
                if let Some(request) = request {
                    input.handle(request);
                }
            }
            _ => {}
        }
        None
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
        let height = self.fields.len() as u16 * 2 + 5;
        let dialog = popup::centered(area, 64, height);
        let title = match self.target {
            Some(id) => format!("Edit {} {id}", self.kind),
            None => format!("New {}", self.kind),
        };
        let inner = popup::panel(frame, dialog, &title, theme::border_active());

        let [body, status, hints] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        if self.phase.is_submitting() {
            loading::render_loading(frame, body, "Saving...", &self.throbber);
        } else {
            self.render_fields(frame, body);
        }

        if let Some(error) = self.phase.error() {
            frame.render_widget(
                Paragraph::new(Span::styled(format!("  ✗ {error}"), theme::error())),
                status,
            );
        }

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("  Tab ", theme::key_hint_key()),
                Span::styled("next field  ", theme::key_hint()),
                Span::styled("Enter ", theme::key_hint_key()),
                Span::styled("save  ", theme::key_hint()),
                Span::styled("Esc ", theme::key_hint_key()),
                Span::styled("cancel", theme::key_hint()),
            ])),
            hints,
        );
    }

    fn render_fields(&self, frame: &mut Frame, area: Rect) {
        const LABEL_WIDTH: u16 = 14;
        let value_width = area.width.saturating_sub(LABEL_WIDTH + 2);

        for (idx, field) in self.fields.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
            let y = area.y + idx as u16 * 2;
            if y >= area.bottom() {
                break;
            }
            let row = Rect::new(area.x, y, area.width, 1);
            let active = idx == self.active;
            let label_style = if active { theme::selected() } else { theme::label() };
            let value_style = if field.locked { theme::muted() } else { theme::text() };

            let value = match &field.value {
                FieldValue::Text(input) => {
                    let scroll = input.visual_scroll(usize::from(value_width));
                    let shown: String = input.value().chars().skip(scroll).collect();
                    if active && !field.locked {
                        #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
                        let cursor = (input.visual_cursor().saturating_sub(scroll)) as u16;
                        frame.set_cursor_position(Position::new(
                            row.x + LABEL_WIDTH + 2 + cursor,
                            row.y,
                        ));
                    }
                    if shown.is_empty() && !active {
                        Span::styled(field.hint, theme::muted())
                    } else {
                        Span::styled(shown, value_style)
                    }
                }
                FieldValue::Toggle(on) => {
                    Span::styled(if *on { "[x]" } else { "[ ]" }, theme::value())
                }
                FieldValue::Choice(_) => {
                    Span::styled(format!("‹ {} ›", field.text_value()), theme::value())
                }
            };

            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled(format!("  {:<12}", field.label), label_style),
                    value,
                ])),
                row,
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    use super::*;

    fn press(dialog: &mut FormDialog, code: KeyCode) -> Option<Action> {
        dialog.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(dialog: &mut FormDialog, text: &str) {
        for ch in text.chars() {
            press(dialog, KeyCode::Char(ch));
        }
    }

    #[test]
    fn changes_have_no_create_form() {
        assert!(FormDialog::new(ResourceKind::Change).is_none());
        assert!(FormDialog::new(ResourceKind::Interface).is_none());
    }

    #[test]
    fn device_fields_build_the_form() {
        let mut dialog = FormDialog::new(ResourceKind::Device).unwrap();
        type_text(&mut dialog, "sw1");
        press(&mut dialog, KeyCode::Tab);
        dialog.paste("role=core; vendor=juniper");

        match press(&mut dialog, KeyCode::Enter) {
            Some(Action::SubmitForm(FormSubmission::Device(form))) => {
                assert_eq!(form.hostname, "sw1");
                assert_eq!(form.attributes, "role=core\nvendor=juniper");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn attribute_choice_and_toggles() {
        let mut dialog = FormDialog::new(ResourceKind::Attribute).unwrap();
        type_text(&mut dialog, "role");
        press(&mut dialog, KeyCode::Tab);
        press(&mut dialog, KeyCode::Right);
        press(&mut dialog, KeyCode::Tab);
        press(&mut dialog, KeyCode::Tab);
        press(&mut dialog, KeyCode::Char(' '));

        let FormSubmission::Attribute(form) = dialog.submission() else {
            panic!("expected attribute form");
        };
        assert_eq!(form.name, "role");
        assert_eq!(form.resource_name, "Network");
        assert!(form.required);
        assert!(form.display);
        assert!(!form.multi);
    }

    #[test]
    fn submitting_locks_input_until_finished() {
        let mut dialog = FormDialog::new(ResourceKind::Network).unwrap();
        type_text(&mut dialog, "10.0.0.0/8");
        assert!(dialog.begin_submit());
        assert!(!dialog.begin_submit());

        assert!(press(&mut dialog, KeyCode::Esc).is_none());
        assert!(!dialog.close());

        assert!(!dialog.finish(Err(Some("overlaps".into()))));
        assert_eq!(dialog.phase.error(), Some("overlaps"));
        let FormSubmission::Network(form) = dialog.submission() else {
            panic!("expected network form");
        };
        assert_eq!(form.cidr, "10.0.0.0/8");

        assert!(dialog.begin_submit());
        assert!(dialog.finish(Ok(())));
    }

    #[test]
    fn edit_prefills_and_locks_fixed_fields() {
        let prefill = FormSubmission::Network(NetworkForm {
            cidr: "10.0.0.0/24".into(),
            attributes: "role=core\nvendor=juniper".into(),
        });
        let mut dialog = FormDialog::edit(EntityId::new(4), &prefill);
        assert_eq!(dialog.target(), Some(EntityId::new(4)));
        assert_eq!(dialog.active, 1);

        press(&mut dialog, KeyCode::Up);
        type_text(&mut dialog, "99");
        press(&mut dialog, KeyCode::Tab);
        type_text(&mut dialog, "; owner=neteng");

        let FormSubmission::Network(form) = dialog.submission() else {
            panic!("expected network form");
        };
        assert_eq!(form.cidr, "10.0.0.0/24");
        assert_eq!(form.attributes, "role=core\nvendor=juniper\nowner=neteng");
    }

    #[test]
    fn attribute_edit_keeps_its_resource() {
        let prefill = FormSubmission::Attribute(AttributeForm {
            name: "owner".into(),
            resource_name: "Interface".into(),
            description: "who".into(),
            required: true,
            display: false,
            multi: false,
        });
        let dialog = FormDialog::edit(EntityId::new(2), &prefill);
        let FormSubmission::Attribute(form) = dialog.submission() else {
            panic!("expected attribute form");
        };
        assert_eq!(form.resource_name, "Interface");
        assert!(form.required);
        assert_eq!(form.description, "who");
    }

    #[test]
    fn backspace_edits_the_active_field() {
        let mut dialog = FormDialog::new(ResourceKind::Device).unwrap();
        type_text(&mut dialog, "sw12");
        press(&mut dialog, KeyCode::Backspace);
        let FormSubmission::Device(form) = dialog.submission() else {
            panic!("expected device form");
        };
        assert_eq!(form.hostname, "sw1");
    }
}
