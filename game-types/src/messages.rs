use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{LeaderboardEntry, MatchSnapshot};

/// Messages sent by the browser client. Tool calls from the voice agent are
/// relayed here verbatim; each maps to one client tool.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ClientMessage {
    SubmitGuess { word: String },
    GetGameStatus,
    ResetGame,
    StartNextRound,
    DeclineLeaderboard,
    Heartbeat,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ServerMessage {
    /// Instructional natural-language reply for the voice agent.
    ToolResult { text: String },
    /// Safe state for UI re-render, sent after every mutating tool call.
    StateUpdate { snapshot: MatchSnapshot },
    /// The final score made (or may make) the top 20; ask the player for a name.
    LeaderboardPrompt { final_score: i32 },
    /// Leaderboard flow resolved; show the board with an optional consolation.
    LeaderboardShown {
        message: Option<String>,
        entries: Vec<LeaderboardEntry>,
    },
    Error { message: String },
}
