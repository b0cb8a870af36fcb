//! Swiss round pairing.
//!
//! Standings are put in pairing order (wins ascending, ties by player id
//! ascending) and consumed two at a time. The rematch-avoiding variant
//! searches the same order for a complete pairing with no repeat match-ups.

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{Match, Pairing, PlayerId, StandingRecord};

/// Search steps allowed before the rematch-avoiding search gives up.
pub const REMATCH_SEARCH_BUDGET: usize = 100_000;

/// Errors that prevent a round from being paired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PairingError {
    #[error("Cannot pair an odd number of players ({0})")]
    OddPlayerCount(usize),

    #[error("At least 2 players are needed to pair a round, found {0}")]
    InsufficientPlayers(usize),
}

fn check_pairable(count: usize) -> Result<(), PairingError> {
    if count < 2 {
        return Err(PairingError::InsufficientPlayers(count));
    }
    if count % 2 != 0 {
        return Err(PairingError::OddPlayerCount(count));
    }
    Ok(())
}

/// Standings in pairing order: wins ascending, then player id ascending.
pub fn pairing_order(standings: &[StandingRecord]) -> Vec<&StandingRecord> {
    let mut ordered: Vec<&StandingRecord> = standings.iter().collect();
    ordered.sort_by(|a, b| a.wins.cmp(&b.wins).then_with(|| a.player_id.cmp(&b.player_id)));
    ordered
}

fn adjacent_pairs(ordered: &[&StandingRecord]) -> Vec<Pairing> {
    ordered
        .chunks_exact(2)
        .map(|pair| Pairing::new(pair[0], pair[1]))
        .collect()
}

/// Pair each player with their neighbour in pairing order.
///
/// Element 2k meets element 2k+1. Rematches are not considered.
pub fn compute_pairings(standings: &[StandingRecord]) -> Result<Vec<Pairing>, PairingError> {
    check_pairable(standings.len())?;

    let ordered = pairing_order(standings);
    let pairings = adjacent_pairs(&ordered);

    debug!("Paired {} players into {} matches", standings.len(), pairings.len());
    Ok(pairings)
}

/// Unordered key for a match-up between two players.
fn matchup(a: PlayerId, b: PlayerId) -> (PlayerId, PlayerId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Pair the round while avoiding players who already met.
///
/// Each unpaired player, in pairing order, takes the nearest following
/// opponent they have not played, backtracking when the rest of the field
/// cannot be completed. When no rematch-free pairing exists, or the search
/// exceeds [`REMATCH_SEARCH_BUDGET`] steps, the plain adjacent pairing is
/// returned instead.
pub fn compute_pairings_avoiding_rematches(
    standings: &[StandingRecord],
    history: &[Match],
) -> Result<Vec<Pairing>, PairingError> {
    check_pairable(standings.len())?;

    let ordered = pairing_order(standings);
    let played: HashSet<(PlayerId, PlayerId)> = history
        .iter()
        .filter(|m| m.winner.is_some())
        .map(|m| matchup(m.home, m.visitor))
        .collect();

    let mut search = RematchSearch::new(&ordered, &played, REMATCH_SEARCH_BUDGET);
    match search.solve() {
        SearchOutcome::Found => {
            let pairings = search
                .picks
                .iter()
                .map(|&(a, b)| Pairing::new(ordered[a], ordered[b]))
                .collect();
            info!(
                "Paired {} players with no rematches ({} search steps)",
                ordered.len(),
                search.steps
            );
            Ok(pairings)
        }
        outcome => {
            warn!(
                "No rematch-free pairing found ({:?} after {} steps); using adjacent pairing",
                outcome, search.steps
            );
            Ok(adjacent_pairs(&ordered))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchOutcome {
    Found,
    Exhausted,
    OverBudget,
}

/// One level of the search: `first` is pinned, and `next` is the index of
/// the next opponent to try for it.
#[derive(Debug)]
struct Frame {
    first: usize,
    next: usize,
    chosen: Option<usize>,
}

struct RematchSearch<'a> {
    ordered: &'a [&'a StandingRecord],
    played: &'a HashSet<(PlayerId, PlayerId)>,
    budget: usize,
    paired: Vec<bool>,
    picks: Vec<(usize, usize)>,
    steps: usize,
}

impl<'a> RematchSearch<'a> {
    fn new(
        ordered: &'a [&'a StandingRecord],
        played: &'a HashSet<(PlayerId, PlayerId)>,
        budget: usize,
    ) -> Self {
        Self {
            ordered,
            played,
            budget,
            paired: vec![false; ordered.len()],
            picks: Vec::with_capacity(ordered.len() / 2),
            steps: 0,
        }
    }

    fn have_met(&self, a: usize, b: usize) -> bool {
        self.played
            .contains(&matchup(self.ordered[a].player_id, self.ordered[b].player_id))
    }

    fn next_unpaired(&self, from: usize) -> Option<usize> {
        (from..self.ordered.len()).find(|&i| !self.paired[i])
    }

    /// Depth-first search on an explicit stack, so the depth of the field
    /// never reaches the thread's call stack. Every candidate examined costs
    /// one step, rejected or not.
    fn solve(&mut self) -> SearchOutcome {
        let Some(first) = self.next_unpaired(0) else {
            return SearchOutcome::Found;
        };
        self.paired[first] = true;
        let mut stack = vec![Frame {
            first,
            next: first + 1,
            chosen: None,
        }];

        while let Some(frame) = stack.last_mut() {
            // Back here after the level below was exhausted: undo our pick
            if let Some(prev) = frame.chosen.take() {
                self.paired[prev] = false;
                self.picks.pop();
            }

            let mut candidate = None;
            while frame.next < self.ordered.len() {
                let second = frame.next;
                frame.next += 1;

                self.steps += 1;
                if self.steps > self.budget {
                    return SearchOutcome::OverBudget;
                }
                if self.paired[second] || self.have_met(frame.first, second) {
                    continue;
                }
                candidate = Some(second);
                break;
            }

            let Some(second) = candidate else {
                self.paired[frame.first] = false;
                stack.pop();
                continue;
            };

            frame.chosen = Some(second);
            self.paired[second] = true;
            self.picks.push((frame.first, second));

            let Some(following) = self.next_unpaired(frame.first + 1) else {
                return SearchOutcome::Found;
            };
            self.paired[following] = true;
            stack.push(Frame {
                first: following,
                next: following + 1,
                chosen: None,
            });
        }

        SearchOutcome::Exhausted
    }
}
