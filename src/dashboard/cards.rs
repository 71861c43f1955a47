//! The stat cards shown at the top of the dashboard.

use maud::{Markup, html};

use crate::{
    html::{format_currency, format_percent},
    transaction::Statistics,
};

const CARD_STYLE: &str = "flex flex-col gap-1 p-4 rounded-lg bg-white \
    dark:bg-gray-800 border border-gray-200 dark:border-gray-700";

const CARD_LABEL_STYLE: &str = "text-sm text-gray-500 dark:text-gray-400";

const CARD_VALUE_STYLE: &str = "text-xl font-bold text-gray-900 dark:text-white";

fn card(label: &str, value: &str) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            span class=(CARD_LABEL_STYLE) { (label) }
            span class=(CARD_VALUE_STYLE) { (value) }
        }
    }
}

/// Render the stat cards for the given figures.
///
/// The three status cards show the currency total for that status, with the
/// transaction count in the card label.
pub(super) fn stat_cards(statistics: &Statistics) -> Markup {
    html! {
        div class="grid grid-cols-2 md:grid-cols-3 lg:grid-cols-6 gap-4 w-full mb-6"
        {
            (card("Total amount", &format_currency(statistics.total_amount)))
            (card("Transactions", &statistics.total_count.to_string()))
            (card(
                &format!("Awaiting ({})", statistics.awaiting_count),
                &format_currency(statistics.awaiting_amount),
            ))
            (card(
                &format!("Withdrawn ({})", statistics.withdrawn_count),
                &format_currency(statistics.withdrawn_amount),
            ))
            (card(
                &format!("Failed ({})", statistics.failed_count),
                &format_currency(statistics.failed_amount),
            ))
            (card("Success rate", &format_percent(statistics.success_rate_percent)))
        }
    }
}

#[cfg(test)]
mod stat_cards_tests {
    use crate::transaction::Statistics;

    use super::stat_cards;

    #[test]
    fn cards_show_the_formatted_figures() {
        let markup = stat_cards(&Statistics {
            total_amount: 2500.0,
            total_count: 4,
            awaiting_count: 1,
            awaiting_amount: 100.0,
            withdrawn_count: 2,
            withdrawn_amount: 2350.75,
            failed_count: 1,
            failed_amount: 49.25,
            success_rate_percent: 50.0,
        })
        .into_string();

        assert!(markup.contains("R$2,500.00"));
        assert!(markup.contains("50.0%"));
    }

    #[test]
    fn status_cards_show_per_status_totals() {
        let markup = stat_cards(&Statistics {
            total_amount: 2500.0,
            total_count: 4,
            awaiting_count: 1,
            awaiting_amount: 100.0,
            withdrawn_count: 2,
            withdrawn_amount: 2350.75,
            failed_count: 1,
            failed_amount: 49.25,
            success_rate_percent: 50.0,
        })
        .into_string();

        assert!(markup.contains("Awaiting (1)"));
        assert!(markup.contains("R$100.00"));
        assert!(markup.contains("Withdrawn (2)"));
        assert!(markup.contains("R$2,350.75"));
        assert!(markup.contains("Failed (1)"));
        assert!(markup.contains("R$49.25"));
    }

    #[test]
    fn empty_statistics_render_zeroes() {
        let markup = stat_cards(&Statistics::default()).into_string();

        assert!(markup.contains("R$0.00"));
        assert!(markup.contains("0.0%"));
    }
}
