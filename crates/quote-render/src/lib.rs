pub mod currency;
pub mod dashboard;
pub mod history;
pub mod profile;
pub mod proposal;

pub use currency::{display_date, format_inr};
pub use dashboard::{dashboard_rows, render_dashboard, DashboardRow};
pub use history::render_history;
pub use profile::StudioProfile;
pub use proposal::render_proposal;
