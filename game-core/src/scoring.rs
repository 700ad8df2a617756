use game_types::LeaderboardDecision;

/// How many entries the leaderboard keeps; also the qualification cutoff.
pub const LEADERBOARD_SIZE: usize = 20;

/// Score for winning a round on the k-th guess, counting the winning guess.
/// First guess scores 100, second 90, and so on, flooring at 0.
pub fn round_score(guess_count: u32) -> i32 {
    (110 - 10 * guess_count as i32).max(0)
}

/// Top-20 gate: qualify when the board has room or the final score beats the
/// current lowest top score. `top_scores` is the pre-insertion snapshot sorted
/// descending; a race with concurrent submissions is accepted.
pub fn leaderboard_decision(final_score: i32, top_scores: &[i32]) -> LeaderboardDecision {
    if top_scores.len() < LEADERBOARD_SIZE {
        return LeaderboardDecision::Qualified;
    }
    let lowest_top_score = top_scores.last().copied().unwrap_or(0);
    if final_score > lowest_top_score {
        LeaderboardDecision::Qualified
    } else {
        LeaderboardDecision::NotQualified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_score_boundaries() {
        assert_eq!(round_score(1), 100);
        assert_eq!(round_score(2), 90);
        assert_eq!(round_score(5), 60);
        assert_eq!(round_score(10), 10);
        // Beyond the guess limit the formula floors at zero
        assert_eq!(round_score(11), 0);
        assert_eq!(round_score(12), 0);
        assert_eq!(round_score(100), 0);
    }

    #[test]
    fn test_leaderboard_qualifies_with_room_on_board() {
        assert_eq!(leaderboard_decision(10, &[]), LeaderboardDecision::Qualified);

        let nineteen: Vec<i32> = (0..19).map(|i| 500 - i * 10).collect();
        assert_eq!(
            leaderboard_decision(1, &nineteen),
            LeaderboardDecision::Qualified
        );
    }

    #[test]
    fn test_leaderboard_full_board_threshold() {
        let full: Vec<i32> = (0..20).map(|i| 500 - i * 10).collect(); // lowest 310
        assert_eq!(
            leaderboard_decision(310, &full),
            LeaderboardDecision::NotQualified
        );
        assert_eq!(
            leaderboard_decision(311, &full),
            LeaderboardDecision::Qualified
        );
        assert_eq!(
            leaderboard_decision(0, &full),
            LeaderboardDecision::NotQualified
        );
    }

    #[test]
    fn test_leaderboard_consolation_scenario() {
        // Final round lost with 150 against a full top-20 whose lowest is 200
        let full: Vec<i32> = (0..20).map(|i| 400 - i * 10).collect();
        assert_eq!(*full.last().unwrap(), 210);
        let mut full = full;
        *full.last_mut().unwrap() = 200;
        assert_eq!(
            leaderboard_decision(150, &full),
            LeaderboardDecision::NotQualified
        );
    }
}
