//! Search bar: category selector plus the query box.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub label: &'static str,
    pub active: bool,
}

pub struct SearchBar<'a> {
    pub title: &'a str,
    pub categories: Vec<CategoryOption>,
    pub query: &'a str,
    /// The query box has focus and shows a cursor.
    pub editing: bool,
    pub active_style: Style,
    pub inactive_style: Style,
    pub border_style: Style,
}

impl<'a> SearchBar<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let mut spans: Vec<Span> = self
            .categories
            .iter()
            .map(|category| {
                let style = if category.active {
                    self.active_style
                } else {
                    self.inactive_style
                };
                Span::styled(format!(" {} ", category.label), style)
            })
            .collect();

        spans.push(Span::raw(" | "));
        let cursor = if self.editing { "_" } else { "" };
        spans.push(Span::styled(
            format!("{}{}", self.query, cursor),
            if self.editing {
                self.active_style
            } else {
                self.inactive_style
            },
        ));

        let paragraph = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .title(self.title)
                .borders(Borders::ALL)
                .border_style(self.border_style),
        );
        f.render_widget(paragraph, area);
    }
}
