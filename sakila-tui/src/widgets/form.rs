//! Labelled text form rendered inside modals.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use sakila_core::FormBuffer;

pub struct FormView<'a> {
    pub title: &'a str,
    pub form: &'a FormBuffer,
    pub error: Option<&'a str>,
    pub hint: &'a str,
    pub label_style: Style,
    pub focus_style: Style,
    pub error_style: Style,
    pub border_style: Style,
}

impl<'a> FormView<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        for (index, field) in self.form.fields().iter().enumerate() {
            let focused = index == self.form.focus();
            let (marker, style) = if focused {
                ("> ", self.focus_style)
            } else {
                ("  ", self.label_style)
            };
            let cursor = if focused { "_" } else { "" };
            lines.push(Line::from(vec![
                Span::styled(format!("{}{:<12}", marker, field.label), style),
                Span::raw(format!("{}{}", field.value, cursor)),
            ]));
        }
        lines.push(Line::raw(""));
        if let Some(error) = self.error {
            lines.push(Line::from(Span::styled(error.to_string(), self.error_style)));
        }
        lines.push(Line::from(Span::styled(self.hint.to_string(), self.label_style)));

        let widget = Paragraph::new(Text::from(lines))
            .block(
                Block::default()
                    .title(self.title)
                    .borders(Borders::ALL)
                    .border_style(self.border_style),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(widget, area);
    }
}
