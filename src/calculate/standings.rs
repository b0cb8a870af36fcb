//! Standings aggregation.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::models::{Match, Player, PlayerId, StandingRecord};

/// Compute one standing record per registered player.
///
/// Only matches with a recorded winner count. Both participants get a
/// match played; the winner also gets a win. Players without any counted
/// match get an all-zero record. Matches referring to ids that are not
/// registered are skipped.
///
/// Records come back in the order `players` was given. Callers that need a
/// ranking sort it themselves.
pub fn compute_standings(players: &[Player], matches: &[Match]) -> Vec<StandingRecord> {
    let mut tally: HashMap<PlayerId, (u32, u32)> = players
        .iter()
        .map(|p| (p.id, (0u32, 0u32)))
        .collect();

    let mut skipped = 0usize;
    for m in matches {
        let Some(winner) = m.winner else {
            continue;
        };
        if !m.has_valid_winner()
            || m.home == m.visitor
            || !tally.contains_key(&m.home)
            || !tally.contains_key(&m.visitor)
        {
            skipped += 1;
            continue;
        }

        for participant in [m.home, m.visitor] {
            if let Some((wins, played)) = tally.get_mut(&participant) {
                *played += 1;
                if participant == winner {
                    *wins += 1;
                }
            }
        }
    }

    if skipped > 0 {
        warn!("Skipped {} matches with unknown players or invalid winners", skipped);
    }

    let standings: Vec<StandingRecord> = players
        .iter()
        .map(|p| {
            let (wins, matches_played) = tally.get(&p.id).copied().unwrap_or_default();
            StandingRecord {
                player_id: p.id,
                name: p.name.clone(),
                wins,
                matches_played,
            }
        })
        .collect();

    debug!(
        "Computed standings for {} players from {} matches",
        standings.len(),
        matches.len()
    );
    standings
}

/// Sort standings into ranking order, leader first.
pub fn rank_standings(mut standings: Vec<StandingRecord>) -> Vec<StandingRecord> {
    standings.sort_by(|a, b| a.rank_cmp(b));
    standings
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn player(id: u32, name: &str) -> Player {
        Player::new(PlayerId::new(id), name.to_string())
    }

    fn win(winner: u32, loser: u32) -> Match {
        Match::decided(PlayerId::new(winner), PlayerId::new(loser))
    }

    fn four_players() -> Vec<Player> {
        vec![player(1, "A"), player(2, "B"), player(3, "C"), player(4, "D")]
    }

    fn summary(standings: &[StandingRecord]) -> Vec<(u32, String, u32, u32)> {
        standings
            .iter()
            .map(|s| (s.player_id.get(), s.name.clone(), s.wins, s.matches_played))
            .collect()
    }

    #[test]
    fn test_no_matches_yields_zero_records() {
        let standings = compute_standings(&four_players(), &[]);

        assert_eq!(
            summary(&standings),
            vec![
                (1, "A".to_string(), 0, 0),
                (2, "B".to_string(), 0, 0),
                (3, "C".to_string(), 0, 0),
                (4, "D".to_string(), 0, 0),
            ]
        );
    }

    #[test]
    fn test_one_round_reported() {
        let standings = compute_standings(&four_players(), &[win(1, 2), win(3, 4)]);

        assert_eq!(
            summary(&standings),
            vec![
                (1, "A".to_string(), 1, 1),
                (2, "B".to_string(), 0, 1),
                (3, "C".to_string(), 1, 1),
                (4, "D".to_string(), 0, 1),
            ]
        );
    }

    #[test]
    fn test_players_without_matches_are_merged_in() {
        let players = vec![player(1, "A"), player(2, "B"), player(3, "C")];
        let standings = compute_standings(&players, &[win(2, 1)]);

        assert_eq!(standings.len(), 3);
        let c = standings.iter().find(|s| s.player_id.get() == 3).unwrap();
        assert_eq!((c.wins, c.matches_played), (0, 0));
    }

    #[test]
    fn test_each_player_exactly_once() {
        let players: Vec<Player> = (1..=10).map(|i| player(i, &format!("P{}", i))).collect();
        let matches = vec![win(1, 2), win(1, 3), win(4, 1), win(5, 6), win(7, 8)];

        let standings = compute_standings(&players, &matches);
        let ids: HashSet<PlayerId> = standings.iter().map(|s| s.player_id).collect();

        assert_eq!(standings.len(), players.len());
        assert_eq!(ids.len(), players.len());
    }

    #[test]
    fn test_win_and_match_arithmetic() {
        let players: Vec<Player> = (1..=6).map(|i| player(i, &format!("P{}", i))).collect();
        let matches = vec![win(1, 2), win(3, 1), win(1, 4), win(5, 6), win(6, 5), win(2, 3)];

        let standings = compute_standings(&players, &matches);

        for s in &standings {
            let played = matches.iter().filter(|m| m.involves(s.player_id)).count() as u32;
            let won = matches
                .iter()
                .filter(|m| m.winner == Some(s.player_id))
                .count() as u32;
            assert_eq!(s.matches_played, played, "player {}", s.player_id);
            assert_eq!(s.wins, won, "player {}", s.player_id);
            assert!(s.wins <= s.matches_played);
        }
    }

    #[test]
    fn test_undecided_matches_are_not_counted() {
        let mut undecided = win(1, 2);
        undecided.winner = None;

        let standings = compute_standings(&four_players(), &[undecided, win(3, 4)]);
        assert_eq!(standings[0].matches_played, 0);
        assert_eq!(standings[1].matches_played, 0);
        assert_eq!(standings[2].matches_played, 1);
    }

    #[test]
    fn test_unknown_players_are_skipped() {
        let standings = compute_standings(&four_players(), &[win(1, 99), win(2, 3)]);

        assert_eq!(standings[0].matches_played, 0);
        assert_eq!(standings[1].wins, 1);
        assert_eq!(standings[2].matches_played, 1);
    }

    #[test]
    fn test_invalid_winner_is_skipped() {
        let mut bogus = win(1, 2);
        bogus.winner = Some(PlayerId::new(3));

        let standings = compute_standings(&four_players(), &[bogus]);
        assert!(standings.iter().all(|s| s.matches_played == 0));
    }

    #[test]
    fn test_empty_player_set() {
        assert!(compute_standings(&[], &[win(1, 2)]).is_empty());
    }

    #[test]
    fn test_rank_standings_leader_first() {
        let standings = compute_standings(&four_players(), &[win(4, 3), win(2, 1), win(4, 2)]);
        let ranked = rank_standings(standings);

        let ids: Vec<u32> = ranked.iter().map(|s| s.player_id.get()).collect();
        // 1 and 3 are level on 0/1 and fall back to id order
        assert_eq!(ids, vec![4, 2, 1, 3]);
    }
}
