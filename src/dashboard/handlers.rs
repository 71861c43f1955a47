//! The dashboard page handler.

use axum::extract::{Query, State};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    dashboard::cards::stat_cards,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, PAGE_CONTAINER_STYLE, base},
    navigation::nav_bar,
    transaction::{FilterParams, TransactionManager, transaction_table},
};

/// Display the dashboard: the stat cards over everything the session can
/// see, and the transaction table narrowed down by the query string.
///
/// The stat cards are computed before the filter is applied, so they always
/// describe the whole visible collection.
pub async fn get_dashboard_page(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Markup, Error> {
    let session = state.session.current();

    let mut manager =
        TransactionManager::new(state.transaction_store(), session.clone());
    manager.load()?;

    let statistics = manager.statistics();

    let filter = params.to_filter();
    let mut transactions = manager.transactions().to_vec();
    filter.apply(&mut transactions);

    let content = html! {
        (nav_bar(&session))

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex items-center gap-4 w-full mb-4"
            {
                h1 class="text-2xl font-bold" { "Dashboard" }

                a
                    href=(endpoints::NEW_TRANSACTION_VIEW)
                    class=(format!("{BUTTON_PRIMARY_STYLE} ml-auto"))
                {
                    "New transaction"
                }
            }

            (stat_cards(&statistics))

            (transaction_table(&transactions, &filter, session.is_admin_effective()))
        }
    };

    Ok(base("Dashboard", &content))
}
