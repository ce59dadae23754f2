//! Modal overlays: forms, confirmations, customer details and the
//! blocking alert, drawn last so they sit on top of the page.

use crate::nav::View;
use crate::state::App;
use crate::theme::rental_color;
use crate::views::centered_rect;
use crate::widgets::FormView;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use sakila_core::{is_open_rental, ListModal, RecordId};

pub fn render(f: &mut Frame<'_>, app: &App) {
    match app.active_view {
        View::Home => {}
        View::Films => {
            if let Some(ListModal::Rent(film_id)) = app.films.modal {
                let title = app
                    .films
                    .find(film_id)
                    .map(|film| format!("Rent: {}", film.text("title")))
                    .unwrap_or_else(|| format!("Rent film #{}", film_id.get()));
                render_form(f, app, &title, &app.films.form, app.films.form_error.as_deref());
            }
        }
        View::Customer => match app.customers.modal {
            Some(ListModal::Create) => render_form(
                f,
                app,
                "Add Customer",
                &app.customers.form,
                app.customers.form_error.as_deref(),
            ),
            Some(ListModal::Edit(id)) => render_form(
                f,
                app,
                &format!("Edit Customer #{}", id.get()),
                &app.customers.form,
                app.customers.form_error.as_deref(),
            ),
            Some(ListModal::ConfirmDelete(id)) => render_confirm_delete(f, app, id.get()),
            Some(ListModal::Details(_)) => render_details(f, app),
            Some(ListModal::Rent(_)) | None => {}
        },
    }

    if let Some(alert) = &app.alert {
        let area = centered_rect(50, 25, f.size());
        f.render_widget(Clear, area);
        let paragraph = Paragraph::new(Text::from(vec![
            Line::from(Span::styled(
                alert.message.clone(),
                Style::default().fg(app.theme.text),
            )),
            Line::raw(""),
            Line::from(Span::styled(
                "[Enter] OK",
                Style::default().fg(app.theme.text_dim),
            )),
        ]))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(alert.title.as_str())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.error)),
        );
        f.render_widget(paragraph, area);
    }
}

fn render_form(
    f: &mut Frame<'_>,
    app: &App,
    title: &str,
    form: &sakila_core::FormBuffer,
    error: Option<&str>,
) {
    let area = centered_rect(60, 40, f.size());
    f.render_widget(Clear, area);
    FormView {
        title,
        form,
        error,
        hint: "[Enter] Submit  [Esc] Cancel",
        label_style: Style::default().fg(app.theme.text_dim),
        focus_style: Style::default()
            .fg(app.theme.primary)
            .add_modifier(Modifier::BOLD),
        error_style: Style::default().fg(app.theme.error),
        border_style: app.theme.border(true),
    }
    .render(f, area);
}

fn render_confirm_delete(f: &mut Frame<'_>, app: &App, id: i64) {
    let customers = &app.customers;
    let name = customers
        .visible()
        .iter()
        .find(|c| c.int("customer_id") == Some(id))
        .map(|c| format!("{} {}", c.text("first_name"), c.text("last_name")))
        .unwrap_or_else(|| format!("customer #{}", id));

    let area = centered_rect(50, 25, f.size());
    f.render_widget(Clear, area);
    let mut lines = vec![
        Line::from(format!("Delete {}?", name)),
        Line::raw(""),
    ];
    if let Some(error) = &customers.form_error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(app.theme.error),
        )));
    }
    lines.push(Line::from(Span::styled(
        "[y/Enter] Delete  [Esc] Cancel",
        Style::default().fg(app.theme.text_dim),
    )));
    let paragraph = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title("Confirm Delete")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.warning)),
        );
    f.render_widget(paragraph, area);
}

fn render_details(f: &mut Frame<'_>, app: &App) {
    let Some(details) = app.customers.detail.as_ref() else {
        return;
    };
    let area = centered_rect(70, 70, f.size());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title("Customer Details [r return] [Esc close]")
        .borders(Borders::ALL)
        .border_style(app.theme.border(true));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(inner);

    let customer = &details.customer;
    let label = Style::default().fg(app.theme.secondary);
    let summary = Paragraph::new(Text::from(vec![
        Line::from(vec![
            Span::styled("Name: ", label),
            Span::raw(format!(
                "{} {}",
                customer.text("first_name"),
                customer.text("last_name")
            )),
        ]),
        Line::from(vec![
            Span::styled("Email: ", label),
            Span::raw(customer.text("email")),
        ]),
        Line::from(vec![
            Span::styled("Customer ID: ", label),
            Span::raw(customer.text("customer_id")),
        ]),
    ]));
    f.render_widget(summary, chunks[0]);

    render_rentals(f, app, chunks[1]);
}

fn render_rentals(f: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(details) = app.customers.detail.as_ref() else {
        return;
    };
    let selected = app.selected_rental();

    let mut highlighted = None;
    let items: Vec<ListItem> = details
        .rentals
        .iter()
        .enumerate()
        .map(|(index, rental)| {
            let open = is_open_rental(rental);
            if open && selected.is_some_and(|s| std::ptr::eq(s, rental)) {
                highlighted = Some(index);
            }
            let status = if open {
                "OPEN".to_string()
            } else {
                format!("returned {}", rental.text("return_date"))
            };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{:<32}", rental.text("title"))),
                Span::raw(format!("rented {}  ", rental.text("rental_date"))),
                Span::styled(status, Style::default().fg(rental_color(open, &app.theme))),
            ]))
        })
        .collect();

    let title = format!(
        "Rental History ({} open)",
        details.open_rentals().count()
    );
    let mut state = ListState::default();
    state.select(highlighted);
    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::TOP))
        .highlight_style(app.theme.highlight());
    f.render_stateful_widget(list, area, &mut state);
}
