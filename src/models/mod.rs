pub mod user;
pub mod entry;
pub mod achievement;
pub mod leaderboard;


pub use user::*;
pub use entry::*;
pub use achievement::*;
pub use leaderboard::*;
