//! Eco-RVM recycling-rewards dashboard client.
//!
//! Number formatting, toasts, chart configuration, counter animation and the
//! two backend calls (redeem a reward, load dashboard statistics), written
//! against an in-memory page model so every side effect can be observed in
//! tests. The `ecorvm` binary drives the same code from the terminal.

pub mod actions;
pub mod animate;
pub mod api;
pub mod charts;
pub mod cli;
pub mod config;
pub mod format;
pub mod logging;
pub mod notify;
pub mod page;

pub use actions::{
    Navigator, RedeemOutcome, StatValue, animate_number, load_dashboard_stats, redeem_reward,
    update_stat_element,
};
pub use charts::{create_donut_chart, create_recycling_chart};
pub use format::format_number;
pub use notify::{Notifier, Severity};
pub use page::{Page, initialize_page};
