pub mod achievements;
pub mod auth;
pub mod carbon;
pub mod leaderboard;
pub mod users;

pub use achievements::list_achievements_handler;
pub use auth::{login_handler, register_handler};
pub use carbon::{
    create_entry_handler, emission_factors_handler, estimate_handler, list_entries_handler,
    summary_handler,
};
pub use leaderboard::leaderboard_handler;
pub use users::{get_profile_handler, update_profile_handler};
