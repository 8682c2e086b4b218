//! Presentation functions.
//!
//! Everything here takes plain data and returns widgets or text; nothing
//! reads the store or sends actions. Containers in `screens` decide what
//! to pass in.

use ratatui::layout::Constraint;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Row};
use serde_json::Value;

use nsot_core::{
    Attribute, Attributes, Change, Device, FieldChange, Interface, Network, PageInfo, Resource,
    ResourceError,
};

use crate::theme;

/// Placeholder for absent values.
pub const NONE: &str = "─";

// ── Scalars ──────────────────────────────────────────────────────────

/// Attribute values: strings unquoted, lists comma-joined.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => NONE.into(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

/// `key=value, key=value` for table cells.
pub fn attributes_inline(attributes: &Attributes) -> String {
    if attributes.is_empty() {
        return NONE.into();
    }
    attributes
        .iter()
        .map(|(k, v)| format!("{k}={}", value_text(v)))
        .collect::<Vec<_>>()
        .join(", ")
}

// ── Lines ────────────────────────────────────────────────────────────

/// One `label  value` row of a detail panel.
pub fn field_line(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {label:<16}"), theme::label()),
        Span::styled(value.into(), theme::value()),
    ])
}

pub fn attribute_lines(attributes: &Attributes) -> Vec<Line<'static>> {
    if attributes.is_empty() {
        return vec![Line::from(Span::styled("  (no attributes)", theme::muted()))];
    }
    attributes
        .iter()
        .map(|(k, v)| field_line(k, value_text(v)))
        .collect()
}

pub fn error_line(error: &ResourceError) -> Line<'static> {
    let status = error
        .status
        .map(|s| format!(" ({s})"))
        .unwrap_or_default();
    Line::from(Span::styled(
        format!("  ✗ {}{status}", error.message),
        theme::error(),
    ))
}

/// `page 2 of 3 · 21 total`, or nothing before the first page arrives.
pub fn pagination_text(info: Option<PageInfo>) -> String {
    match info {
        None => String::new(),
        Some(info) if info.total_pages() == 0 => "no results".into(),
        Some(info) => format!(
            "page {} of {} · {} total",
            info.page() + 1,
            info.total_pages(),
            info.count
        ),
    }
}

pub fn pagination_footer(info: Option<PageInfo>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {}", pagination_text(info)), theme::muted()),
        Span::styled("   [ ", theme::key_hint_key()),
        Span::styled("prev  ", theme::key_hint()),
        Span::styled("] ", theme::key_hint_key()),
        Span::styled("next", theme::key_hint()),
    ])
}

/// Before/after rows of a change diff.
pub fn diff_lines(diff: &[FieldChange]) -> Vec<Line<'static>> {
    if diff.is_empty() {
        return vec![Line::from(Span::styled("  (no field changes)", theme::muted()))];
    }
    diff.iter()
        .map(|c| {
            Line::from(vec![
                Span::styled(format!("  {:<16}", c.field), theme::label()),
                Span::styled(value_text(&c.old), theme::diff_old()),
                Span::styled("  →  ", theme::muted()),
                Span::styled(value_text(&c.new), theme::diff_new()),
            ])
        })
        .collect()
}

// ── Tables ───────────────────────────────────────────────────────────

/// Column layout and row rendering for a list screen.
pub trait Listing: Resource {
    const TITLE: &'static str;

    fn columns() -> &'static [(&'static str, Constraint)];

    fn cells(&self) -> Vec<String>;

    /// Short name for confirmations and toasts.
    fn label(&self) -> String;

    fn header() -> Row<'static> {
        Row::new(Self::columns().iter().map(|(name, _)| Cell::from(*name)))
            .style(theme::table_header())
    }

    fn widths() -> Vec<Constraint> {
        Self::columns().iter().map(|(_, w)| *w).collect()
    }

    fn row(&self) -> Row<'static> {
        Row::new(self.cells().into_iter().map(Cell::from)).style(theme::text())
    }
}

impl Listing for Device {
    const TITLE: &'static str = "Devices";

    fn columns() -> &'static [(&'static str, Constraint)] {
        &[
            ("ID", Constraint::Length(6)),
            ("Hostname", Constraint::Percentage(35)),
            ("Attributes", Constraint::Fill(1)),
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.hostname.clone(),
            attributes_inline(&self.attributes),
        ]
    }

    fn label(&self) -> String {
        self.hostname.clone()
    }
}

impl Listing for Network {
    const TITLE: &'static str = "Networks";

    fn columns() -> &'static [(&'static str, Constraint)] {
        &[
            ("ID", Constraint::Length(6)),
            ("CIDR", Constraint::Length(24)),
            ("State", Constraint::Length(10)),
            ("Parent", Constraint::Length(8)),
            ("Attributes", Constraint::Fill(1)),
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.cidr(),
            self.state.map_or_else(|| NONE.into(), |v| v.to_string()),
            self.parent_id.map_or_else(|| NONE.into(), |v| v.to_string()),
            attributes_inline(&self.attributes),
        ]
    }

    fn label(&self) -> String {
        self.cidr()
    }
}

impl Listing for Attribute {
    const TITLE: &'static str = "Attributes";

    fn columns() -> &'static [(&'static str, Constraint)] {
        &[
            ("ID", Constraint::Length(6)),
            ("Name", Constraint::Percentage(25)),
            ("Resource", Constraint::Length(10)),
            ("Req", Constraint::Length(4)),
            ("Multi", Constraint::Length(6)),
            ("Description", Constraint::Fill(1)),
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.resource_name
                .map_or_else(|| NONE.into(), |v| v.to_string()),
            yes_no(self.required).into(),
            yes_no(self.multi).into(),
            self.description.clone(),
        ]
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

impl Listing for Change {
    const TITLE: &'static str = "Changes";

    fn columns() -> &'static [(&'static str, Constraint)] {
        &[
            ("ID", Constraint::Length(6)),
            ("When", Constraint::Length(20)),
            ("Event", Constraint::Length(8)),
            ("Resource", Constraint::Length(18)),
            ("User", Constraint::Fill(1)),
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.change_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            self.event.map_or_else(|| NONE.into(), |v| v.to_string()),
            format!("{} {}", self.resource_name, self.resource_id),
            self.user.email.clone(),
        ]
    }

    fn label(&self) -> String {
        format!("#{}", self.id)
    }
}

/// Interfaces only appear nested under a device.
pub fn interface_header() -> Row<'static> {
    Row::new(["Name", "MAC", "Speed", "Addresses"].map(Cell::from)).style(theme::table_header())
}

pub fn interface_widths() -> [Constraint; 4] {
    [
        Constraint::Length(12),
        Constraint::Length(19),
        Constraint::Length(8),
        Constraint::Fill(1),
    ]
}

pub fn interface_row(interface: &Interface) -> Row<'static> {
    let addresses = if interface.addresses.is_empty() {
        NONE.into()
    } else {
        interface.addresses.join(", ")
    };
    Row::new([
        Cell::from(interface.name.clone()),
        Cell::from(
            interface
                .mac_address
                .clone()
                .unwrap_or_else(|| NONE.into()),
        ),
        Cell::from(interface.speed.map_or_else(|| NONE.into(), |v| v.to_string())),
        Cell::from(addresses),
    ])
    .style(theme::text())
}

/// Centered one-liner for empty and not-found states.
pub fn notice(text: impl Into<String>, style: Style) -> Line<'static> {
    Line::from(Span::styled(text.into(), style)).centered()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use nsot_core::EntityId;

    use super::*;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn values_render_without_json_noise() {
        assert_eq!(value_text(&json!("core")), "core");
        assert_eq!(value_text(&json!(["a", "b"])), "a, b");
        assert_eq!(value_text(&json!(7)), "7");
        assert_eq!(value_text(&Value::Null), NONE);
    }

    #[test]
    fn pagination_is_one_based_for_humans() {
        assert_eq!(pagination_text(None), "");
        let info = PageInfo {
            count: 21,
            limit: Some(10),
            offset: 20,
        };
        assert_eq!(pagination_text(Some(info)), "page 3 of 3 · 21 total");
        let empty = PageInfo {
            count: 0,
            limit: Some(10),
            offset: 0,
        };
        assert_eq!(pagination_text(Some(empty)), "no results");
    }

    #[test]
    fn device_cells_keep_attribute_order() {
        let mut attributes = Attributes::new();
        attributes.insert("role".into(), json!("core"));
        attributes.insert("vendor".into(), json!("juniper"));
        let device = Device {
            id: EntityId::new(7),
            hostname: "sw1".into(),
            attributes,
            site_id: Some(EntityId::new(1)),
        };
        assert_eq!(
            device.cells(),
            vec!["7".to_owned(), "sw1".into(), "role=core, vendor=juniper".into()]
        );
        assert_eq!(device.cells().len(), Device::columns().len());
    }

    #[test]
    fn diff_shows_old_and_new() {
        let diff = [FieldChange {
            field: "hostname".into(),
            old: json!("sw1"),
            new: json!("sw2"),
        }];
        let lines = diff_lines(&diff);
        assert_eq!(lines.len(), 1);
        let text = line_text(&lines[0]);
        assert!(text.contains("sw1"));
        assert!(text.contains("sw2"));
    }
}
