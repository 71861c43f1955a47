//! The transaction table with its filter form and sortable headers.

use maud::{Markup, html};

use crate::{
    endpoints,
    endpoints::format_endpoint,
    html::{
        BADGE_AWAITING_STYLE, BADGE_FAILED_STYLE, BADGE_WITHDRAWN_STYLE, BUTTON_DELETE_STYLE,
        BUTTON_PRIMARY_STYLE, FORM_SELECT_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency, format_date,
    },
    transaction::{
        Platform, SortKey, SortOrder, Status, TransactionFilter, TransactionWithOwner,
    },
};

fn status_badge(status: Status) -> Markup {
    let style = match status {
        Status::Awaiting => BADGE_AWAITING_STYLE,
        Status::Withdrawn => BADGE_WITHDRAWN_STYLE,
        Status::Failed => BADGE_FAILED_STYLE,
    };

    html! { span class=(style) { (status.label()) } }
}

// Percent-encode the characters that would break a query string. The other
// filter values are fixed identifiers and need no encoding.
fn encode_query_value(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());

    for character in value.chars() {
        match character {
            ' ' => encoded.push('+'),
            '%' => encoded.push_str("%25"),
            '&' => encoded.push_str("%26"),
            '=' => encoded.push_str("%3D"),
            '+' => encoded.push_str("%2B"),
            '#' => encoded.push_str("%23"),
            '?' => encoded.push_str("%3F"),
            character => encoded.push(character),
        }
    }

    encoded
}

fn sort_href(filter: &TransactionFilter, key: SortKey) -> String {
    // Clicking the current sort column again flips the direction.
    let order = if filter.sort == key {
        filter.order.toggled()
    } else {
        SortOrder::default()
    };

    format!(
        "{}?search={}&status={}&platform={}&sort={}&order={}",
        endpoints::DASHBOARD_VIEW,
        encode_query_value(&filter.search_text),
        filter.status.map(|status| status.as_str()).unwrap_or(""),
        filter
            .platform
            .as_ref()
            .map(Platform::as_str)
            .unwrap_or(""),
        key.as_str(),
        order.as_str(),
    )
}

fn sort_header(filter: &TransactionFilter, key: SortKey, label: &str) -> Markup {
    let marker = if filter.sort == key {
        match filter.order {
            SortOrder::Ascending => " ▲",
            SortOrder::Descending => " ▼",
        }
    } else {
        ""
    };

    html! {
        th class=(TABLE_CELL_STYLE)
        {
            a href=(sort_href(filter, key)) class="hover:underline" { (label) (marker) }
        }
    }
}

fn filter_form(filter: &TransactionFilter) -> Markup {
    html! {
        form
            action=(endpoints::DASHBOARD_VIEW)
            method="get"
            class="flex flex-wrap items-end gap-2 mb-4"
        {
            input type="hidden" name="sort" value=(filter.sort.as_str());
            input type="hidden" name="order" value=(filter.order.as_str());

            input
                type="search"
                name="search"
                placeholder="Search platform"
                value=(filter.search_text)
                class=(FORM_TEXT_INPUT_STYLE)
                style="max-width: 14rem";

            select name="status" class=(FORM_SELECT_STYLE) style="max-width: 10rem"
            {
                option value="" { "All statuses" }
                @for status in Status::ALL
                {
                    option
                        value=(status.as_str())
                        selected[filter.status == Some(status)]
                    {
                        (status.label())
                    }
                }
            }

            select name="platform" class=(FORM_SELECT_STYLE) style="max-width: 10rem"
            {
                option value="" { "All platforms" }
                @for code in Platform::ALL
                {
                    option
                        value=(code)
                        selected[filter.platform.as_ref().is_some_and(|platform| platform.as_str() == code)]
                    {
                        (code)
                    }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Filter" }
        }
    }
}

/// Render the transaction table for the dashboard.
///
/// `is_admin` controls the admin-only affordances: the owner column and the
/// delete buttons. An admin viewing the app as another user renders the
/// plain table, same as the user themselves would see.
pub(crate) fn transaction_table(
    transactions: &[TransactionWithOwner],
    filter: &TransactionFilter,
    is_admin: bool,
) -> Markup {
    html! {
        (filter_form(filter))

        div class="w-full overflow-x-auto"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        (sort_header(filter, SortKey::Code, "Code"))
                        (sort_header(filter, SortKey::Platform, "Platform"))
                        (sort_header(filter, SortKey::Amount, "Amount"))
                        (sort_header(filter, SortKey::TransactionDate, "Date"))
                        (sort_header(filter, SortKey::Status, "Status"))
                        @if is_admin
                        {
                            th class=(TABLE_CELL_STYLE) { "Owner" }
                        }
                        th class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @if transactions.is_empty()
                    {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) colspan="7" { "No transactions found." }
                        }
                    }

                    @for entry in transactions
                    {
                        @let transaction = &entry.transaction;

                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE)
                            {
                                (transaction.code.as_deref().unwrap_or("—"))
                            }
                            td class=(TABLE_CELL_STYLE) { (transaction.platform) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(transaction.amount)) }
                            td class=(TABLE_CELL_STYLE) { (format_date(transaction.transaction_date)) }
                            td class=(TABLE_CELL_STYLE) { (status_badge(transaction.status)) }
                            @if is_admin
                            {
                                td class=(TABLE_CELL_STYLE) { (entry.owner.display_name) }
                            }
                            td class=(TABLE_CELL_STYLE)
                            {
                                div class="flex gap-2"
                                {
                                    a
                                        href=(format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id.as_i64()))
                                        class=(LINK_STYLE)
                                    {
                                        "Edit"
                                    }

                                    @if is_admin
                                    {
                                        form
                                            action=(format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id.as_i64()))
                                            method="post"
                                        {
                                            button type="submit" class=(BUTTON_DELETE_STYLE) { "Delete" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
