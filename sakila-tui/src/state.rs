//! Application state and action dispatch.
//!
//! `App` owns one state machine per page and routes key actions into them.
//! Backend failures on fetches become a blocking [`Alert`]; failures on
//! writes stay inside the open modal so the user can correct the form.

use crate::config::TuiConfig;
use crate::keys::{Action, InputMode};
use crate::nav::View;
use crate::notifications::{Alert, Notification, NotificationLevel};
use crate::theme::SynthBruteTheme;
use sakila_core::{
    ApiError, ApiResult, CustomerDetails, Customers, Films, HomePanel, HomeState, ListModal,
    ListViewState, Record, RentalId, SakilaApi, SearchCategory,
};
use std::sync::Arc;
use tracing::{debug, error, info};

pub struct App {
    pub config: TuiConfig,
    pub theme: SynthBruteTheme,
    pub api: Arc<dyn SakilaApi>,
    pub active_view: View,

    pub home: HomeState,
    pub films: ListViewState<Films>,
    pub customers: ListViewState<Customers>,

    /// Text typed into the search box; `Some` while the box has focus.
    pub search_input: Option<String>,
    /// Highlighted open rental in the customer detail modal.
    pub rental_cursor: Option<usize>,

    pub notifications: Vec<Notification>,
    pub alert: Option<Alert>,
}

impl App {
    pub fn new(config: TuiConfig, api: Arc<dyn SakilaApi>) -> Self {
        Self {
            config,
            theme: SynthBruteTheme::synthbrute(),
            api,
            active_view: View::Home,
            home: HomeState::new(),
            films: ListViewState::new(),
            customers: ListViewState::new(),
            search_input: None,
            rental_cursor: None,
            notifications: Vec::new(),
            alert: None,
        }
    }

    pub fn input_mode(&self) -> InputMode {
        if self.alert.is_some() {
            return InputMode::Navigate;
        }
        if self.search_input.is_some() {
            return InputMode::Text;
        }
        let form_open = match self.active_view {
            View::Home => false,
            View::Films => self.films.modal.is_some_and(|m| m.has_form()),
            View::Customer => self.customers.modal.is_some_and(|m| m.has_form()),
        };
        if form_open {
            InputMode::Text
        } else {
            InputMode::Navigate
        }
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, message));
    }

    pub fn show_error(&mut self, err: &ApiError) {
        error!(
            view = self.active_view.title(),
            status = err.status(),
            error = %err,
            "Request failed"
        );
        self.alert = Some(Alert::error(err.to_string()));
    }

    /// Surface a failed operation as a blocking alert.
    fn report<T>(&mut self, result: ApiResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.show_error(&err);
                None
            }
        }
    }

    fn modal_open(&self) -> bool {
        match self.active_view {
            View::Home => false,
            View::Films => self.films.modal.is_some(),
            View::Customer => self.customers.modal.is_some(),
        }
    }

    /// Switch to `view`, discarding its previous state and loading it fresh.
    pub async fn enter_view(&mut self, view: View) {
        info!(view = view.title(), "Entering view");
        self.active_view = view;
        self.search_input = None;
        self.rental_cursor = None;
        let result = match view {
            View::Home => {
                self.home = HomeState::new();
                self.home.load(self.api.as_ref()).await
            }
            View::Films => {
                self.films = ListViewState::new();
                self.films.load(self.api.as_ref()).await
            }
            View::Customer => {
                self.customers = ListViewState::new();
                self.customers.load(self.api.as_ref()).await
            }
        };
        self.report(result);
    }

    pub async fn refresh(&mut self) {
        let result = match self.active_view {
            View::Home => self.home.load(self.api.as_ref()).await,
            View::Films => self.films.refresh(self.api.as_ref()).await,
            View::Customer => self.customers.refresh(self.api.as_ref()).await,
        };
        self.report(result);
    }

    /// Apply one key action. Returns `true` when the app should exit.
    pub async fn handle_action(&mut self, action: Action) -> bool {
        if action == Action::Quit {
            return true;
        }
        if self.alert.is_some() {
            if matches!(action, Action::Confirm | Action::Cancel) {
                self.alert = None;
            }
            return false;
        }
        if self.search_input.is_some() {
            self.handle_search_input(action).await;
            return false;
        }

        if !self.modal_open() {
            match action {
                Action::NextView => {
                    self.enter_view(self.active_view.next()).await;
                    return false;
                }
                Action::PrevView => {
                    self.enter_view(self.active_view.previous()).await;
                    return false;
                }
                Action::SwitchView(index) => {
                    if let Some(view) = View::from_index(index) {
                        self.enter_view(view).await;
                    }
                    return false;
                }
                Action::Refresh => {
                    self.refresh().await;
                    return false;
                }
                _ => {}
            }
        }

        match self.active_view {
            View::Home => self.handle_home(action).await,
            View::Films => self.handle_films(action).await,
            View::Customer => self.handle_customers(action).await,
        }
        false
    }

    // ------------------------------------------------------------------
    // Search box
    // ------------------------------------------------------------------

    fn open_search(&mut self) {
        let query = match self.active_view {
            View::Home => return,
            View::Films => self.films.search.query.clone(),
            View::Customer => self.customers.search.query.clone(),
        };
        self.search_input = Some(query);
    }

    fn cycle_category(&mut self) {
        match self.active_view {
            View::Home => {}
            View::Films => self.films.search.category = self.films.search.category.next(),
            View::Customer => {
                self.customers.search.category = self.customers.search.category.next()
            }
        }
    }

    async fn handle_search_input(&mut self, action: Action) {
        let Some(input) = self.search_input.as_mut() else {
            return;
        };
        match action {
            Action::Input(c) => input.push(c),
            Action::Backspace => {
                input.pop();
            }
            Action::NextField => self.cycle_category(),
            Action::Cancel => self.search_input = None,
            Action::Confirm => {
                let query = self.search_input.take().unwrap_or_default();
                self.submit_search(&query).await;
            }
            _ => {}
        }
    }

    pub async fn submit_search(&mut self, query: &str) {
        let result = match self.active_view {
            View::Home => Ok(()),
            View::Films => {
                let category = self.films.search.category;
                self.films
                    .run_search(self.api.as_ref(), query, category)
                    .await
            }
            View::Customer => {
                let category = self.customers.search.category;
                self.customers
                    .run_search(self.api.as_ref(), query, category)
                    .await
            }
        };
        self.report(result);
    }

    // ------------------------------------------------------------------
    // Home
    // ------------------------------------------------------------------

    async fn handle_home(&mut self, action: Action) {
        match action {
            Action::MoveDown => self.home.move_cursor(true),
            Action::MoveUp => self.home.move_cursor(false),
            Action::MoveLeft | Action::MoveRight => self.home.toggle_focus(),
            Action::Confirm => match self.home.focus {
                HomePanel::Films => {
                    if let Some(index) = self.home.film_cursor {
                        self.home.toggle_film(index);
                    }
                }
                HomePanel::Actors => {
                    if let Some(index) = self.home.actor_cursor {
                        let result = self.home.toggle_actor(self.api.as_ref(), index).await;
                        self.report(result);
                    }
                }
            },
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Films
    // ------------------------------------------------------------------

    async fn handle_films(&mut self, action: Action) {
        if let Some(ListModal::Rent(film_id)) = self.films.modal {
            match action {
                Action::Input(c) => self.films.form.insert_char(c),
                Action::Backspace => self.films.form.backspace(),
                Action::NextField => self.films.form.focus_next(),
                Action::PrevField => self.films.form.focus_prev(),
                Action::Cancel => self.films.close_modal(),
                Action::Confirm => {
                    let input = self.films.form.value("customer_id").to_string();
                    match self
                        .films
                        .submit_rent(self.api.as_ref(), film_id, &input)
                        .await
                    {
                        Ok(ack) => self.notify(
                            NotificationLevel::Success,
                            ack.message
                                .unwrap_or_else(|| "Film rented successfully".to_string()),
                        ),
                        Err(err) => debug!(%film_id, error = %err, "Rental kept open for correction"),
                    }
                }
                _ => {}
            }
            return;
        }
        if self.films.modal.is_some() {
            if matches!(action, Action::Cancel | Action::Confirm) {
                self.films.close_modal();
            }
            return;
        }

        match action {
            Action::MoveDown => self.films.select_next(),
            Action::MoveUp => self.films.select_previous(),
            Action::OpenSearch => self.open_search(),
            Action::CycleCategory => self.cycle_category(),
            Action::ClearSearch => {
                let result = self.films.clear_search(self.api.as_ref()).await;
                self.report(result);
            }
            Action::Confirm => {
                if let Some(record) = self.films.highlighted().cloned() {
                    let result = self.films.select_for_view(self.api.as_ref(), &record).await;
                    self.report(result);
                }
            }
            Action::Rent => {
                if let Some(record) = self.films.highlighted().cloned() {
                    let result = self.films.open_rent(&record);
                    self.report(result);
                }
            }
            Action::Cancel => self.films.collapse(),
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Customers
    // ------------------------------------------------------------------

    async fn handle_customers(&mut self, action: Action) {
        match self.customers.modal {
            Some(ListModal::Create) | Some(ListModal::Edit(_)) => {
                self.handle_customer_form(action).await
            }
            Some(ListModal::ConfirmDelete(id)) => match action {
                Action::Confirm => {
                    match self.customers.submit_delete(self.api.as_ref(), id).await {
                        Ok(ack) => self.notify(
                            NotificationLevel::Success,
                            ack.message
                                .unwrap_or_else(|| "Customer deleted successfully".to_string()),
                        ),
                        Err(err) => self.write_failed(err),
                    }
                }
                Action::Cancel => self.customers.close_modal(),
                _ => {}
            },
            Some(ListModal::Details(_)) => self.handle_customer_details(action).await,
            Some(ListModal::Rent(_)) => self.customers.close_modal(),
            None => self.handle_customer_list(action).await,
        }
    }

    async fn handle_customer_list(&mut self, action: Action) {
        match action {
            Action::MoveDown => self.customers.select_next(),
            Action::MoveUp => self.customers.select_previous(),
            Action::MoveLeft => {
                let result = self.customers.prev_page(self.api.as_ref()).await;
                self.report(result);
            }
            Action::MoveRight => {
                let result = self.customers.next_page(self.api.as_ref()).await;
                self.report(result);
            }
            Action::OpenSearch => self.open_search(),
            Action::CycleCategory => self.cycle_category(),
            Action::ClearSearch => {
                let result = self.customers.clear_search(self.api.as_ref()).await;
                self.report(result);
            }
            Action::NewItem => self.customers.open_create(),
            Action::EditItem => {
                if let Some(record) = self.customers.highlighted().cloned() {
                    let result = self.customers.select_for_edit(&record);
                    self.report(result);
                }
            }
            Action::DeleteItem => {
                if let Some(record) = self.customers.highlighted().cloned() {
                    let result = self.customers.open_delete(&record);
                    self.report(result);
                }
            }
            Action::Confirm => {
                if let Some(record) = self.customers.highlighted().cloned() {
                    let result = self
                        .customers
                        .select_for_view(self.api.as_ref(), &record)
                        .await;
                    if self.report(result).is_some() {
                        self.rental_cursor = first_open_rental(self.customers.detail.as_ref());
                    }
                }
            }
            _ => {}
        }
    }

    async fn handle_customer_form(&mut self, action: Action) {
        match action {
            Action::Input(c) => self.customers.form.insert_char(c),
            Action::Backspace => self.customers.form.backspace(),
            Action::NextField => self.customers.form.focus_next(),
            Action::PrevField => self.customers.form.focus_prev(),
            Action::Cancel => self.customers.close_modal(),
            Action::Confirm => {
                let payload = self.customers.form.to_customer_payload();
                let result = match self.customers.modal {
                    Some(ListModal::Edit(id)) => {
                        self.customers
                            .submit_edit(self.api.as_ref(), id, &payload)
                            .await
                    }
                    _ => {
                        self.customers
                            .submit_create(self.api.as_ref(), &payload)
                            .await
                    }
                };
                match result {
                    Ok(ack) => self.notify(
                        NotificationLevel::Success,
                        ack.message.unwrap_or_else(|| "Customer saved".to_string()),
                    ),
                    Err(err) => self.write_failed(err),
                }
            }
            _ => {}
        }
    }

    async fn handle_customer_details(&mut self, action: Action) {
        let open = self
            .customers
            .detail
            .as_ref()
            .map(|d| d.open_rentals().count())
            .unwrap_or(0);
        match action {
            Action::MoveDown if open > 0 => {
                self.rental_cursor = Some(self.rental_cursor.map_or(0, |i| (i + 1) % open));
            }
            Action::MoveUp if open > 0 => {
                self.rental_cursor = Some(match self.rental_cursor {
                    Some(0) | None => open - 1,
                    Some(i) => i - 1,
                });
            }
            Action::Rent => {
                let Some(rental) = self.selected_rental().cloned() else {
                    return;
                };
                let rental_id = match rental.require_id::<RentalId>("rental_id") {
                    Ok(id) => id,
                    Err(err) => {
                        self.show_error(&err.into());
                        return;
                    }
                };
                let result = self
                    .customers
                    .return_rental(self.api.as_ref(), rental_id)
                    .await;
                if let Some(ack) = self.report(result) {
                    self.notify(
                        NotificationLevel::Success,
                        ack.message.unwrap_or_else(|| "Rental returned".to_string()),
                    );
                    self.rental_cursor = first_open_rental(self.customers.detail.as_ref());
                }
            }
            Action::Cancel | Action::Confirm => {
                self.customers.close_modal();
                self.rental_cursor = None;
            }
            _ => {}
        }
    }

    /// Open rental highlighted in the detail modal.
    pub fn selected_rental(&self) -> Option<&Record> {
        let detail = self.customers.detail.as_ref()?;
        detail.open_rentals().nth(self.rental_cursor?)
    }

    /// A rejected write keeps its modal open with the message inline. If the
    /// modal already closed, the write went through and the reload failed.
    fn write_failed(&mut self, err: ApiError) {
        if self.customers.modal.is_some() {
            debug!(error = %err, "Write kept open for correction");
        } else {
            self.show_error(&err);
        }
    }
}

fn first_open_rental(detail: Option<&CustomerDetails>) -> Option<usize> {
    detail
        .filter(|d| d.open_rentals().next().is_some())
        .map(|_| 0)
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use crate::config::ThemeConfig;
    use proptest::prelude::*;
    use sakila_test_utils::MockApi;

    fn arb_view() -> impl Strategy<Value = View> {
        prop_oneof![Just(View::Home), Just(View::Films), Just(View::Customer)]
    }

    fn app() -> App {
        let config = TuiConfig {
            api_base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_ms: 1_000,
            persistence_path: "tmp/sakila-tui.json".into(),
            log_path: "tmp/sakila-tui.log".into(),
            theme: ThemeConfig {
                name: "synthbrute".to_string(),
            },
        };
        App::new(config, Arc::new(MockApi::new()))
    }

    proptest! {
        #[test]
        fn alert_forces_navigate_mode(view in arb_view(), searching in any::<bool>()) {
            let mut app = app();
            app.active_view = view;
            if searching {
                app.search_input = Some(String::new());
            }
            app.alert = Some(Alert::error("boom"));
            prop_assert_eq!(app.input_mode(), InputMode::Navigate);
        }

        #[test]
        fn only_form_modals_take_text(view in arb_view()) {
            let mut app = app();
            app.active_view = view;
            app.customers.open_create();
            let expected = if view == View::Customer {
                InputMode::Text
            } else {
                InputMode::Navigate
            };
            prop_assert_eq!(app.input_mode(), expected);
        }
    }
}
