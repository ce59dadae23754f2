//! Page-number strip under paginated tables.

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use sakila_core::PageState;

pub struct Pager<'a> {
    pub page: &'a PageState,
    pub current_style: Style,
    pub style: Style,
    pub disabled_style: Style,
}

impl<'a> Pager<'a> {
    pub fn spans(&self) -> Vec<Span<'static>> {
        let edge = |label: &'static str, enabled: bool| {
            Span::styled(
                label,
                if enabled {
                    self.style
                } else {
                    self.disabled_style
                },
            )
        };

        let mut spans = vec![edge("« Prev ", self.page.has_prev())];
        for number in self.page.window() {
            if number == self.page.current_page {
                spans.push(Span::styled(format!("[{}]", number), self.current_style));
            } else {
                spans.push(Span::styled(format!(" {} ", number), self.style));
            }
        }
        spans.push(edge(" Next »", self.page.has_next()));
        spans.push(Span::styled(
            format!(
                "   Page {} of {}",
                self.page.current_page, self.page.total_pages
            ),
            self.disabled_style,
        ));
        spans
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let paragraph = Paragraph::new(Line::from(self.spans())).alignment(Alignment::Center);
        f.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(page: &PageState) -> String {
        let pager = Pager {
            page,
            current_style: Style::default(),
            style: Style::default(),
            disabled_style: Style::default(),
        };
        pager
            .spans()
            .iter()
            .map(|s| s.content.to_string())
            .collect()
    }

    #[test]
    fn shows_window_around_current_page() {
        let page = PageState {
            current_page: 3,
            total_pages: 5,
            page_size: 10,
        };
        let text = text_of(&page);
        assert!(text.contains(" 2 [3] 4 "));
        assert!(!text.contains(" 5 "));
        assert!(text.ends_with("Page 3 of 5"));
    }
}
