//! The page and handler for editing an existing transaction.

use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use maud::Markup;

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints,
    endpoints::format_endpoint,
    html::format_date_input,
    transaction::{
        Transaction, TransactionId, TransactionManager, TransactionPatch,
        create_endpoint::{TransactionFormData, parse_transaction_form, transaction_form_page},
    },
};

fn form_values(transaction: &Transaction) -> TransactionFormData {
    TransactionFormData {
        code: transaction.code.clone().unwrap_or_default(),
        platform: transaction.platform.as_str().to_owned(),
        amount: transaction.amount.to_string(),
        transaction_date: format_date_input(transaction.transaction_date),
        status: transaction.status.as_str().to_owned(),
        notes: transaction.notes.clone(),
    }
}

/// Display the page for editing the transaction with `transaction_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the transaction does not exist and
/// [Error::Forbidden] if it belongs to another user and the session does
/// not have admin rights.
pub async fn get_edit_transaction_page(
    State(state): State<AppState>,
    Path(transaction_id): Path<i64>,
) -> Result<Markup, Error> {
    let manager =
        TransactionManager::new(state.transaction_store(), state.session.current());
    let transaction = manager.get(TransactionId::new(transaction_id))?;

    Ok(transaction_form_page(
        "Edit Transaction",
        &format_endpoint(endpoints::UPDATE_TRANSACTION, transaction_id),
        &form_values(&transaction),
        None,
    ))
}

/// Handler for updating a transaction via the POST method.
///
/// The edit form posts every field, so the whole record is replaced. On
/// success the client is redirected to the dashboard, a validation problem
/// or a duplicate code renders the form again with an error message.
pub async fn update_transaction_endpoint(
    State(state): State<AppState>,
    Path(transaction_id): Path<i64>,
    Form(form_data): Form<TransactionFormData>,
) -> Response {
    let action = format_endpoint(endpoints::UPDATE_TRANSACTION, transaction_id);
    let render_error = |message: String| {
        transaction_form_page(
            "Edit Transaction",
            &action,
            &form_data,
            Some(Alert::error("Could not save the transaction.", &message)),
        )
        .into_response()
    };

    let draft = match parse_transaction_form(&form_data) {
        Ok(draft) => draft,
        Err(message) => return render_error(message),
    };

    let patch = TransactionPatch {
        code: Some(draft.code),
        platform: Some(draft.platform),
        amount: Some(draft.amount),
        transaction_date: Some(draft.transaction_date),
        status: Some(draft.status),
        notes: Some(draft.notes),
    };

    let mut manager =
        TransactionManager::new(state.transaction_store(), state.session.current());

    match manager.update(TransactionId::new(transaction_id), patch) {
        Ok(()) => Redirect::to(endpoints::DASHBOARD_VIEW).into_response(),
        Err(error @ Error::DuplicateCode(_)) => render_error(format!("{error}.")),
        Err(error) => error.into_response(),
    }
}
