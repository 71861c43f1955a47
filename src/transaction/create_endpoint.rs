//! The page and handler for recording a new transaction.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE,
        LINK_STYLE, base, labelled_text_input,
    },
    transaction::{Platform, Status, TransactionDraft, TransactionManager},
};

/// The raw values of the transaction form, used for both recording and
/// editing a transaction.
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct TransactionFormData {
    /// The platform's withdrawal code. May be left empty.
    #[serde(default)]
    pub code: String,
    /// The platform code.
    #[serde(default)]
    pub platform: String,
    /// The amount, as typed.
    #[serde(default)]
    pub amount: String,
    /// The date in HTML date input format.
    #[serde(default)]
    pub transaction_date: String,
    /// The status identifier.
    #[serde(default)]
    pub status: String,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

/// Render the transaction form with the given values filled in.
pub(crate) fn transaction_form_page(
    title: &str,
    action: &str,
    values: &TransactionFormData,
    alert: Option<Alert>,
) -> Markup {
    let content = html! {
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold my-4" { (title) }

            @if let Some(alert) = alert
            {
                (alert.into_html())
            }

            form action=(action) method="post" class="flex flex-col gap-4 w-full"
            {
                (labelled_text_input("text", "code", "Code (optional)", &values.code, None))

                div
                {
                    label for="platform" class=(FORM_LABEL_STYLE) { "Platform" }
                    select name="platform" id="platform" class=(FORM_SELECT_STYLE)
                    {
                        @for code in Platform::ALL
                        {
                            option value=(code) selected[values.platform == code] { (code) }
                        }
                    }
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                    input
                        type="number"
                        name="amount"
                        id="amount"
                        step="0.01"
                        min="0"
                        value=(values.amount)
                        class=(FORM_SELECT_STYLE);
                }

                (labelled_text_input("date", "transaction_date", "Date", &values.transaction_date, None))

                div
                {
                    label for="status" class=(FORM_LABEL_STYLE) { "Status" }
                    select name="status" id="status" class=(FORM_SELECT_STYLE)
                    {
                        @for status in Status::ALL
                        {
                            option
                                value=(status.as_str())
                                selected[values.status == status.as_str()]
                            {
                                (status.label())
                            }
                        }
                    }
                }

                (labelled_text_input("text", "notes", "Notes", &values.notes, None))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save" }
                a href=(endpoints::DASHBOARD_VIEW) class=(LINK_STYLE) { "Cancel" }
            }
        }
    };

    base(title, &content)
}

/// Turn the raw form values into a validated draft, or a message the form
/// can show next to the offending input.
pub(super) fn parse_transaction_form(
    form_data: &TransactionFormData,
) -> Result<TransactionDraft, String> {
    let platform = Platform::new(&form_data.platform)
        .map_err(|_| "Choose one of the known platforms.".to_owned())?;

    let amount: f64 = form_data
        .amount
        .trim()
        .parse()
        .map_err(|_| "Enter a valid amount.".to_owned())?;

    let transaction_date = crate::html::parse_date_input(&form_data.transaction_date)
        .ok_or_else(|| "Enter a valid date.".to_owned())?;

    let status =
        Status::parse(&form_data.status).ok_or_else(|| "Choose a valid status.".to_owned())?;

    TransactionDraft::new(
        &form_data.code,
        platform,
        amount,
        transaction_date,
        status,
        &form_data.notes,
    )
    .map_err(|_| "The amount cannot be negative.".to_owned())
}

/// Display the page for recording a new transaction.
pub async fn get_new_transaction_page() -> Markup {
    transaction_form_page(
        "New Transaction",
        endpoints::TRANSACTIONS_API,
        &TransactionFormData::default(),
        None,
    )
}

/// Handler for recording a new transaction via the POST method.
///
/// On success the client is redirected to the dashboard. A validation
/// problem or a duplicate code renders the form again with the entered
/// values and an error message.
pub async fn create_transaction_endpoint(
    State(state): State<AppState>,
    Form(form_data): Form<TransactionFormData>,
) -> Response {
    let render_error = |message: String| {
        transaction_form_page(
            "New Transaction",
            endpoints::TRANSACTIONS_API,
            &form_data,
            Some(Alert::error("Could not save the transaction.", &message)),
        )
        .into_response()
    };

    let draft = match parse_transaction_form(&form_data) {
        Ok(draft) => draft,
        Err(message) => return render_error(message),
    };

    let mut manager =
        TransactionManager::new(state.transaction_store(), state.session.current());

    match manager.create(draft) {
        Ok(_) => Redirect::to(endpoints::DASHBOARD_VIEW).into_response(),
        Err(error @ Error::DuplicateCode(_)) => render_error(format!("{error}.")),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod create_transaction_tests {
    use axum::{
        Router,
        http::StatusCode,
        routing::{get, post},
    };
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        AppState, endpoints,
        session::test_utils::test_user,
        transaction::{Status, TransactionStore},
        user::{NewUser, User, UserStore},
    };

    use super::{create_transaction_endpoint, get_new_transaction_page};

    fn get_test_state() -> (AppState, User) {
        let state = AppState::new(Connection::open_in_memory().unwrap()).unwrap();

        let user = state
            .user_store()
            .create(NewUser {
                username: "alice".to_owned(),
                secret: "hunter2".to_owned(),
                display_name: "Alice".to_owned(),
                is_admin: false,
            })
            .unwrap();

        state.session.with_mut(|session| session.log_in(user.clone()));

        (state, user)
    }

    fn get_test_server(state: AppState) -> TestServer {
        let app = Router::new()
            .route(endpoints::NEW_TRANSACTION_VIEW, get(get_new_transaction_page))
            .route(endpoints::TRANSACTIONS_API, post(create_transaction_endpoint))
            .with_state(state);

        TestServer::new(app)
    }

    fn valid_form() -> Vec<(&'static str, &'static str)> {
        vec![
            ("code", "TRX001"),
            ("platform", "96B"),
            ("amount", "1500"),
            ("transaction_date", "2024-01-15"),
            ("status", "awaiting"),
            ("notes", ""),
        ]
    }

    #[tokio::test]
    async fn new_transaction_page_displays_form() {
        let (state, _) = get_test_state();
        let server = get_test_server(state);

        let response = server.get(endpoints::NEW_TRANSACTION_VIEW).await;

        response.assert_status_ok();
        response.assert_text_contains("New Transaction");
    }

    #[tokio::test]
    async fn valid_form_creates_transaction_and_redirects() {
        let (state, user) = get_test_state();
        let server = get_test_server(state.clone());

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .form(&valid_form())
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), endpoints::DASHBOARD_VIEW);

        let transactions = state.transaction_store().list_by_owner(user.id).unwrap();
        assert_eq!(transactions.len(), 1);
        let transaction = &transactions[0].transaction;
        assert_eq!(transaction.code.as_deref(), Some("TRX001"));
        assert_eq!(transaction.amount, 1500.0);
        assert_eq!(transaction.status, Status::Awaiting);
    }

    #[tokio::test]
    async fn duplicate_code_renders_error_message() {
        let (state, user) = get_test_state();
        let server = get_test_server(state.clone());
        server
            .post(endpoints::TRANSACTIONS_API)
            .form(&valid_form())
            .await;

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .form(&valid_form())
            .await;

        response.assert_status_ok();
        response.assert_text_contains("TRX001");
        response.assert_text_contains("already exists");
        assert_eq!(
            state.transaction_store().list_by_owner(user.id).unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn invalid_platform_renders_error_message() {
        let (state, _) = get_test_state();
        let server = get_test_server(state);

        let mut form = valid_form();
        form[1] = ("platform", "ZZZ");
        let response = server.post(endpoints::TRANSACTIONS_API).form(&form).await;

        response.assert_status_ok();
        response.assert_text_contains("Choose one of the known platforms.");
    }

    #[tokio::test]
    async fn negative_amount_renders_error_message() {
        let (state, user) = get_test_state();
        let server = get_test_server(state.clone());

        let mut form = valid_form();
        form[2] = ("amount", "-5");
        let response = server.post(endpoints::TRANSACTIONS_API).form(&form).await;

        response.assert_status_ok();
        response.assert_text_contains("The amount cannot be negative.");
        assert!(
            state
                .transaction_store()
                .list_by_owner(user.id)
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn impersonated_user_owns_created_transaction() {
        let (state, user) = get_test_state();
        state
            .session
            .with_mut(|session| session.log_in(test_user(99, "admin", true)));
        state
            .session
            .with_mut(|session| session.access_as(user.clone()));
        let server = get_test_server(state.clone());

        server
            .post(endpoints::TRANSACTIONS_API)
            .form(&valid_form())
            .await;

        let transactions = state.transaction_store().list_by_owner(user.id).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].transaction.owner_id, user.id);
    }
}
