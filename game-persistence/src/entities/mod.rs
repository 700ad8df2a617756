pub mod game_sessions;
pub mod match_leaderboard;
pub mod words;

pub mod prelude {
    pub use super::game_sessions::Entity as GameSessions;
    pub use super::match_leaderboard::Entity as MatchLeaderboard;
    pub use super::words::Entity as Words;
}
