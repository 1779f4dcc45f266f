use std::fmt;

use matchling_core::{Hint, Session, SessionConfig, SessionState, SwapOutcome};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameSummary {
    pub seed: u64,
    pub score: u32,
    pub moves_used: u16,
    pub longest_cascade: usize,
    pub state: SessionState,
    /// Stopped on a board with no playable swap.
    pub deadlocked: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub games: Vec<GameSummary>,
    pub won: usize,
    pub lost: usize,
    pub deadlocked: usize,
    pub mean_score: f64,
}

/// Plays `games` sessions, session `i` seeded with `seed + i`, always taking the hint.
pub fn run(config: &SessionConfig, seed: u64, games: u64) -> Summary {
    let games: Vec<_> = (0..games)
        .map(|offset| play_one(config, seed.wrapping_add(offset)))
        .collect();

    let count_state = |state| games.iter().filter(|game| game.state == state).count();
    let won = count_state(SessionState::Won);
    let lost = count_state(SessionState::Lost);
    let deadlocked = games.iter().filter(|game| game.deadlocked).count();
    let mean_score = if games.is_empty() {
        0.0
    } else {
        games.iter().map(|game| f64::from(game.score)).sum::<f64>() / games.len() as f64
    };

    Summary {
        games,
        won,
        lost,
        deadlocked,
        mean_score,
    }
}

fn play_one(config: &SessionConfig, seed: u64) -> GameSummary {
    let mut session = Session::new(config.clone(), seed);
    let mut longest_cascade = 0;
    let mut deadlocked = false;

    while !session.is_finished() {
        let Hint::Swap(swap) = session.hint() else {
            deadlocked = true;
            break;
        };
        match session.swap(swap) {
            Ok(SwapOutcome::Committed(report)) => {
                longest_cascade = longest_cascade.max(report.rounds.len());
            }
            Ok(SwapOutcome::Reverted) => {
                log::warn!("Hinted swap {:?} did not match (seed {})", swap, seed);
                break;
            }
            Err(err) => {
                log::error!("Swap failed: {}", err);
                break;
            }
        }
    }

    log::debug!(
        "seed {}: {:?} with {} points",
        seed,
        session.state(),
        session.score()
    );
    GameSummary {
        seed,
        score: session.score(),
        moves_used: session.config().initial_moves - session.moves_left(),
        longest_cascade,
        state: session.state(),
        deadlocked,
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "games:      {}", self.games.len())?;
        writeln!(f, "won:        {}", self.won)?;
        writeln!(f, "lost:       {}", self.lost)?;
        writeln!(f, "deadlocked: {}", self.deadlocked)?;
        writeln!(f, "mean score: {:.1}", self.mean_score)
    }
}
