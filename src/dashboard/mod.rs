//! The dashboard: stat cards over the visible transactions and the
//! filterable transaction table.

mod cards;
mod handlers;

pub(crate) use handlers::get_dashboard_page;
