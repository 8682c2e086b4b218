//! y/n confirmation overlay for deletes.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::action::ConfirmDelete;
use crate::theme;
use crate::widgets::popup;

pub fn render_confirm(frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
    let width = u16::try_from(confirm.to_string().len() + 8).unwrap_or(u16::MAX).clamp(36, 70);
    let dialog = popup::centered(area, width, 5);
    let inner = popup::panel(frame, dialog, "Confirm", Style::default().fg(theme::WARN));

    let text = vec![
        Line::from(Span::styled(format!("  {confirm}"), theme::text())),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y ", theme::key_hint_key()),
            Span::styled("delete    ", theme::key_hint()),
            Span::styled("n ", theme::key_hint_key()),
            Span::styled("cancel", theme::key_hint()),
        ]),
    ];
    frame.render_widget(Paragraph::new(text), inner);
}
