use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::mem;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Idle -> MatchesFound
/// - MatchesFound -> Removing
/// - Removing -> Refilling
/// - Refilling -> Rechecking
/// - Rechecking -> MatchesFound
/// - Rechecking -> Idle
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CascadePhase {
    Idle,
    MatchesFound,
    Removing,
    Refilling,
    Rechecking,
}

impl CascadePhase {
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl Default for CascadePhase {
    fn default() -> Self {
        Self::Idle
    }
}

/// Gravity and top-up applied to one column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRefill {
    pub col: Coord,
    /// `(from_row, to_row)` for every token that fell, bottom first.
    pub moves: Vec<(Coord, Coord)>,
    /// Fresh tokens placed at the top of the column, top first.
    pub spawned: Vec<(Coord, Token)>,
}

/// Everything that happened in one remove/refill/recheck round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeRound {
    pub groups: Vec<MatchGroup>,
    /// Union of all group positions, row-major.
    pub removed: Vec<Coord2>,
    pub refills: Vec<ColumnRefill>,
    pub score_delta: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeReport {
    pub rounds: Vec<CascadeRound>,
    pub score_delta: u32,
}

impl CascadeReport {
    pub fn removed_count(&self) -> usize {
        self.rounds.iter().map(|round| round.removed.len()).sum()
    }
}

/// One phase transition of a running cascade, for the caller to animate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CascadeStep {
    Scored {
        round: usize,
        groups: Vec<MatchGroup>,
        score_delta: u32,
    },
    Removed {
        round: usize,
        positions: Vec<Coord2>,
    },
    Refilled {
        round: usize,
        columns: Vec<ColumnRefill>,
    },
    /// The refilled board matched again; another round follows.
    Chained {
        round: usize,
        groups: Vec<MatchGroup>,
    },
    Settled(CascadeReport),
}

/// Drives remove, refill and recheck rounds until the board has no match left.
///
/// Each group scores independently, so a cell shared by a row and a column group is paid twice but removed once.
#[derive(Clone, Debug, PartialEq)]
pub struct CascadeResolver {
    phase: CascadePhase,
    points_per_token: u32,
    max_attempts: u8,
    pending: Vec<MatchGroup>,
    current: CascadeRound,
    rounds: Vec<CascadeRound>,
}

impl CascadeResolver {
    pub fn new(points_per_token: u32, max_attempts: u8) -> Self {
        Self {
            phase: CascadePhase::Idle,
            points_per_token,
            max_attempts: max_attempts.max(1),
            pending: Vec::new(),
            current: CascadeRound::default(),
            rounds: Vec::new(),
        }
    }

    pub fn phase(&self) -> CascadePhase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        !self.phase.is_idle()
    }

    /// Starts a cascade from the groups a committed swap produced. Starting with no groups is a no-op.
    pub fn start(&mut self, groups: Vec<MatchGroup>) -> Result<()> {
        if self.is_busy() {
            return Err(GameError::Busy);
        }
        if groups.is_empty() {
            return Ok(());
        }

        self.pending = groups;
        self.rounds.clear();
        self.transition(CascadePhase::MatchesFound);
        Ok(())
    }

    /// Advances one phase. Returns `None` when idle.
    pub fn step<S: RandomSource + ?Sized>(
        &mut self,
        board: &mut Board,
        source: &mut S,
    ) -> Option<CascadeStep> {
        let round = self.rounds.len();

        match self.phase {
            CascadePhase::Idle => None,
            CascadePhase::MatchesFound => {
                let groups = mem::take(&mut self.pending);
                let tokens: u32 = groups.iter().map(|group| u32::from(group.size())).sum();
                let score_delta = tokens.saturating_mul(self.points_per_token);
                self.current = CascadeRound {
                    groups: groups.clone(),
                    score_delta,
                    ..Default::default()
                };
                self.transition(CascadePhase::Removing);
                Some(CascadeStep::Scored {
                    round,
                    groups,
                    score_delta,
                })
            }
            CascadePhase::Removing => {
                let removed: BTreeSet<Coord2> = self
                    .current
                    .groups
                    .iter()
                    .flat_map(|group| group.positions())
                    .collect();
                for &coords in &removed {
                    board.set(coords, Cell::Empty);
                }
                let positions: Vec<Coord2> = removed.into_iter().collect();
                self.current.removed = positions.clone();
                self.transition(CascadePhase::Refilling);
                Some(CascadeStep::Removed { round, positions })
            }
            CascadePhase::Refilling => {
                let mut columns = Vec::new();
                for col in 0..board.size() {
                    let refill = settle_column(board, col, self.max_attempts, source);
                    if !refill.spawned.is_empty() {
                        columns.push(refill);
                    }
                }
                self.current.refills = columns.clone();
                self.transition(CascadePhase::Rechecking);
                Some(CascadeStep::Refilled { round, columns })
            }
            CascadePhase::Rechecking => {
                let finished = mem::take(&mut self.current);
                log::debug!(
                    "Cascade round {} removed {} cell(s) for {} point(s)",
                    round,
                    finished.removed.len(),
                    finished.score_delta
                );
                self.rounds.push(finished);

                let groups = find_matches(board);
                if groups.is_empty() {
                    self.transition(CascadePhase::Idle);
                    let rounds = mem::take(&mut self.rounds);
                    let score_delta = rounds.iter().map(|round| round.score_delta).sum();
                    Some(CascadeStep::Settled(CascadeReport {
                        rounds,
                        score_delta,
                    }))
                } else {
                    self.pending = groups.clone();
                    self.transition(CascadePhase::MatchesFound);
                    Some(CascadeStep::Chained {
                        round: round + 1,
                        groups,
                    })
                }
            }
        }
    }

    /// Steps until the cascade settles.
    pub fn run<S: RandomSource + ?Sized>(
        &mut self,
        board: &mut Board,
        source: &mut S,
    ) -> CascadeReport {
        while let Some(step) = self.step(board, source) {
            if let CascadeStep::Settled(report) = step {
                return report;
            }
        }
        CascadeReport::default()
    }

    /// Drops any in-flight cascade, used when the board is replaced wholesale.
    pub(crate) fn clear(&mut self) {
        self.pending.clear();
        self.current = CascadeRound::default();
        self.rounds.clear();
        self.phase = CascadePhase::Idle;
    }

    fn transition(&mut self, next: CascadePhase) {
        log::trace!("Cascade {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }
}

/// Compacts the column's tokens downward, keeping their order, then tops it up from the first row.
fn settle_column<S: RandomSource + ?Sized>(
    board: &mut Board,
    col: Coord,
    max_attempts: u8,
    source: &mut S,
) -> ColumnRefill {
    let mut refill = ColumnRefill {
        col,
        ..Default::default()
    };

    let mut empty: Coord = 0;
    for row in (0..board.size()).rev() {
        match board[(row, col)] {
            Cell::Empty => empty += 1,
            cell if empty > 0 => {
                board.set((row + empty, col), cell);
                board.set((row, col), Cell::Empty);
                refill.moves.push((row, row + empty));
            }
            _ => {}
        }
    }

    for row in 0..empty {
        let token = draw_token(board, (row, col), max_attempts, source);
        board.set((row, col), Cell::Filled(token));
        refill.spawned.push((row, token));
    }
    refill
}
