//! Customer page: paginated table, search, pager.

use crate::state::App;
use crate::widgets::{CategoryOption, Pager, SearchBar};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use sakila_core::{CustomerCategory, SearchCategory};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let customers = &app.customers;
    let pager_height = if customers.show_pager() { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(pager_height),
        ])
        .split(area);

    render_search(f, app, chunks[0]);
    render_table(f, app, chunks[1]);

    if customers.show_pager() {
        Pager {
            page: &customers.page,
            current_style: app.theme.highlight(),
            style: Style::default().fg(app.theme.text),
            disabled_style: Style::default().fg(app.theme.text_dim),
        }
        .render(f, chunks[2]);
    }
}

fn render_search(f: &mut Frame<'_>, app: &App, area: Rect) {
    let search = &app.customers.search;
    let categories = CustomerCategory::all()
        .iter()
        .map(|c| CategoryOption {
            label: c.label(),
            active: *c == search.category,
        })
        .collect();
    SearchBar {
        title: "Search Customers",
        categories,
        query: app.search_input.as_deref().unwrap_or(&search.query),
        editing: app.search_input.is_some(),
        active_style: Style::default().fg(app.theme.primary),
        inactive_style: Style::default().fg(app.theme.text_dim),
        border_style: app.theme.border(app.search_input.is_some()),
    }
    .render(f, area);
}

fn render_table(f: &mut Frame<'_>, app: &App, area: Rect) {
    let customers = &app.customers;
    let title = if customers.search.active {
        format!("Customers: results for '{}'", customers.search.query)
    } else {
        "Customers".to_string()
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(app.theme.border(app.search_input.is_none()));

    if customers.visible().is_empty() {
        let paragraph = Paragraph::new(Span::styled(
            "No customers found.",
            Style::default().fg(app.theme.text_dim),
        ))
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec!["ID", "First Name", "Last Name", "Email"]).style(
        Style::default()
            .fg(app.theme.secondary)
            .add_modifier(Modifier::BOLD),
    );
    let rows: Vec<Row> = customers
        .visible()
        .iter()
        .map(|customer| {
            Row::new(vec![
                Cell::from(customer.text("customer_id")),
                Cell::from(customer.text("first_name")),
                Cell::from(customer.text("last_name")),
                Cell::from(customer.text("email")),
            ])
        })
        .collect();
    let widths = [
        Constraint::Length(6),
        Constraint::Percentage(25),
        Constraint::Percentage(25),
        Constraint::Min(10),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(app.theme.highlight());

    let mut state = TableState::default();
    state.select(customers.cursor);
    f.render_stateful_widget(table, area, &mut state);
}
