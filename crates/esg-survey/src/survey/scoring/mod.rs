//! Pure reductions over answer sets and submission snapshots.
//!
//! Nothing here caches: every call recomputes from its inputs, and every
//! division is guarded so an empty input yields 0 rather than NaN.

mod aggregate;
mod individual;
pub mod views;

pub use aggregate::{
    category_average as dashboard_category_average, category_averages, item_averages,
    recent_participants, summarize, team_averages, UNSPECIFIED_DEPARTMENT,
};
pub use individual::{category_average, category_profile};
pub use views::{
    CategoryAverageEntry, CategoryProfile, DashboardSummary, ItemStatView, ParticipantView,
    ScoreBand, TeamStatView,
};

/// Rounds half away from zero to `places` decimals.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
