use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Playing,
    Won,
    Lost,
}

impl SessionState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Playing
    }
}

/// Outcome of a swap played through to the end of its cascade.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapOutcome {
    /// No match; the board is as it was and no move was spent.
    Reverted,
    Committed(CascadeReport),
}

impl SwapOutcome {
    /// Whether this outcome could have caused an update to the board
    pub const fn has_update(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

/// One game: the board plus score, move budget and the in-flight cascade, if any.
///
/// While a cascade is running the session is busy and refuses new swaps. Callers that animate drive it with
/// [`Session::begin_swap`] and [`Session::step`]; others use [`Session::swap`].
#[derive(Clone, Debug)]
pub struct Session<S = SmallRng> {
    config: SessionConfig,
    board: Board,
    source: S,
    cascade: CascadeResolver,
    score: u32,
    moves_left: u16,
    level: u16,
    state: SessionState,
}

impl Session<SmallRng> {
    pub fn new(config: SessionConfig, seed: u64) -> Self {
        Self::with_source(config, SmallRng::seed_from_u64(seed))
    }
}

impl<S: RandomSource> Session<S> {
    pub fn with_source(config: SessionConfig, mut source: S) -> Self {
        let config = config.normalized();
        let board = RandomBoardGenerator::new(config.max_draw_attempts)
            .generate(config.board, &mut source);
        log::info!(
            "New {}x{} session with {} kinds",
            config.board.size,
            config.board.size,
            config.board.kinds
        );
        Self::assemble(config, board, source)
    }

    /// Starts a session on a prepared board, which must match the configured size and kinds and be fully filled.
    pub fn from_board(config: SessionConfig, board: Board, source: S) -> Result<Self> {
        let config = config.normalized();
        if !board.is_square() || board.config() != config.board {
            return Err(GameError::InvalidBoardShape);
        }
        if board.empty_count() > 0 {
            return Err(GameError::EmptyCells);
        }
        Ok(Self::assemble(config, board, source))
    }

    fn assemble(config: SessionConfig, board: Board, source: S) -> Self {
        Self {
            cascade: CascadeResolver::new(config.points_per_token, config.max_draw_attempts),
            moves_left: config.initial_moves,
            config,
            board,
            source,
            score: 0,
            level: 1,
            state: SessionState::Playing,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves_left(&self) -> u16 {
        self.moves_left
    }

    pub fn level(&self) -> u16 {
        self.level
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// A swap or cascade is in flight; new input must wait.
    pub fn is_busy(&self) -> bool {
        self.cascade.is_busy()
    }

    pub fn phase(&self) -> CascadePhase {
        self.cascade.phase()
    }

    /// Validates the swap and, when it matches, spends a move and starts the cascade.
    ///
    /// The cascade itself is advanced with [`Session::step`].
    pub fn begin_swap(&mut self, swap: Swap) -> Result<SwapValidation> {
        self.check_idle()?;
        self.check_playing()?;

        let validation = self.board.validate_swap(swap);
        if let SwapValidation::Effective(groups) = &validation {
            self.moves_left = self.moves_left.saturating_sub(1);
            self.cascade.start(groups.clone())?;
            log::debug!("Swap {:?} accepted, {} move(s) left", swap, self.moves_left);
        }
        Ok(validation)
    }

    /// Advances the running cascade by one phase. Returns `None` when nothing is in flight.
    pub fn step(&mut self) -> Option<CascadeStep> {
        let step = self.cascade.step(&mut self.board, &mut self.source)?;

        match &step {
            CascadeStep::Scored { score_delta, .. } => {
                self.score = self.score.saturating_add(*score_delta);
                log::debug!("match: +{} (score {})", score_delta, self.score);
            }
            CascadeStep::Settled(report) => {
                log::debug!(
                    "Cascade settled after {} round(s), +{}",
                    report.rounds.len(),
                    report.score_delta
                );
                self.check_game_over();
            }
            _ => {}
        }
        Some(step)
    }

    /// Plays a swap and its whole cascade.
    pub fn swap(&mut self, swap: Swap) -> Result<SwapOutcome> {
        if !self.begin_swap(swap)?.is_effective() {
            return Ok(SwapOutcome::Reverted);
        }

        while let Some(step) = self.step() {
            if let CascadeStep::Settled(report) = step {
                return Ok(SwapOutcome::Committed(report));
            }
        }
        Ok(SwapOutcome::Committed(CascadeReport::default()))
    }

    /// Suggests a swap, or two random positions when the board is deadlocked.
    pub fn hint(&mut self) -> Hint {
        if let Some(swap) = find_hint(&self.board) {
            return Hint::Swap(swap);
        }

        log::warn!("No move available, showing a placeholder hint");
        let size = self.board.size();
        let mut random_coords = || (self.source.draw(size), self.source.draw(size));
        let first = random_coords();
        let second = random_coords();
        Hint::Placeholder(first, second)
    }

    /// Replaces the board and restores score, moves and level.
    pub fn reset(&mut self) {
        if self.cascade.is_busy() {
            log::debug!("Dropping in-flight cascade at {:?}", self.cascade.phase());
        }
        self.cascade.clear();
        self.board = RandomBoardGenerator::new(self.config.max_draw_attempts)
            .generate(self.config.board, &mut self.source);
        self.score = 0;
        self.moves_left = self.config.initial_moves;
        self.level = 1;
        self.state = SessionState::Playing;
        log::info!("reset");
    }

    fn check_game_over(&mut self) {
        if self.score >= self.config.win_score {
            self.state = SessionState::Won;
            log::info!("Won with a score of {}", self.score);
        } else if self.moves_left == 0 {
            self.state = SessionState::Lost;
            log::info!("Out of moves, final score {}", self.score);
        }
    }

    fn check_idle(&self) -> Result<()> {
        if self.cascade.is_busy() {
            Err(GameError::Busy)
        } else {
            Ok(())
        }
    }

    fn check_playing(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    fn scripted(rows: &[&str], draws: &[u8]) -> Session<ScriptedSource> {
        Session::from_board(
            SessionConfig::default(),
            board_from(7, rows),
            ScriptedSource::new(draws),
        )
        .unwrap()
    }

    #[test]
    fn effective_swap_spends_a_move_and_scores() {
        let mut session = scripted(&END_TO_END, &[5, 6, 5]);

        let outcome = session.swap(Swap::new((3, 3), (3, 4)).unwrap()).unwrap();

        let SwapOutcome::Committed(report) = outcome else {
            panic!("expected a committed swap");
        };
        assert_eq!(report.rounds.len(), 1);
        assert_eq!(report.rounds[0].removed, [(3, 1), (3, 2), (3, 3)]);
        assert_eq!(report.score_delta, 30);
        assert_eq!(session.score(), 30);
        assert_eq!(session.moves_left(), 29);
        assert_eq!(session.board().empty_count(), 0);
        assert!(session.board().is_settled());
        assert!(!session.is_busy());
        assert_eq!(session.state(), SessionState::Playing);
    }

    #[test]
    fn ineffective_swap_is_free() {
        let mut session = scripted(&BACKGROUND, &[0]);
        let before = session.board().clone();

        let outcome = session.swap(Swap::new((0, 0), (0, 1)).unwrap()).unwrap();

        assert_eq!(outcome, SwapOutcome::Reverted);
        assert!(!outcome.has_update());
        assert_eq!(session.board(), &before);
        assert_eq!(session.moves_left(), 30);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn swaps_are_refused_while_a_cascade_runs() {
        let mut session = scripted(&END_TO_END, &[5, 6, 5]);
        let swap = Swap::new((3, 3), (3, 4)).unwrap();

        assert!(session.begin_swap(swap).unwrap().is_effective());
        assert!(session.is_busy());
        assert_eq!(session.phase(), CascadePhase::MatchesFound);
        assert_eq!(session.begin_swap(swap), Err(GameError::Busy));

        assert!(matches!(session.step(), Some(CascadeStep::Scored { .. })));
        assert_eq!(session.score(), 30);
        assert!(matches!(session.step(), Some(CascadeStep::Removed { .. })));
        assert!(matches!(session.step(), Some(CascadeStep::Refilled { .. })));
        assert!(matches!(session.step(), Some(CascadeStep::Settled(_))));
        assert_eq!(session.step(), None);
        assert!(!session.is_busy());
    }

    #[test]
    fn running_out_of_moves_loses() {
        let config = SessionConfig {
            initial_moves: 1,
            ..Default::default()
        };
        let mut session =
            Session::from_board(config, board_from(7, &END_TO_END), ScriptedSource::new(&[5, 6, 5]))
                .unwrap();

        session.swap(Swap::new((3, 3), (3, 4)).unwrap()).unwrap();

        assert_eq!(session.moves_left(), 0);
        assert_eq!(session.state(), SessionState::Lost);
        assert_eq!(
            session.swap(Swap::new((0, 0), (0, 1)).unwrap()),
            Err(GameError::AlreadyEnded)
        );
    }

    #[test]
    fn reaching_the_threshold_wins_before_losing() {
        let config = SessionConfig {
            initial_moves: 1,
            win_score: 30,
            ..Default::default()
        };
        let mut session =
            Session::from_board(config, board_from(7, &END_TO_END), ScriptedSource::new(&[5, 6, 5]))
                .unwrap();

        session.swap(Swap::new((3, 3), (3, 4)).unwrap()).unwrap();

        assert_eq!(session.state(), SessionState::Won);
        assert!(session.is_finished());
    }

    #[test]
    fn hint_reports_a_real_swap() {
        let mut session = scripted(&SINGLE_HINT, &[0]);

        assert_eq!(
            session.hint(),
            Hint::Swap(Swap::new((4, 4), (5, 4)).unwrap())
        );
    }

    #[test]
    fn deadlocked_hint_is_a_placeholder() {
        let mut session = scripted(&BACKGROUND, &[1, 2, 3, 4]);

        assert_eq!(session.hint(), Hint::Placeholder((1, 2), (3, 4)));
    }

    #[test]
    fn reset_restores_counters_and_settles_a_new_board() {
        let mut session = Session::new(SessionConfig::default(), 9);
        let hint = session.hint();
        if let Hint::Swap(swap) = hint {
            session.swap(swap).unwrap();
        }

        session.reset();

        assert_eq!(session.score(), 0);
        assert_eq!(session.moves_left(), 30);
        assert_eq!(session.level(), 1);
        assert_eq!(session.state(), SessionState::Playing);
        assert!(session.board().is_settled());
        assert!(!session.is_busy());
    }

    #[test]
    fn from_board_checks_the_configured_shape() {
        let config = SessionConfig {
            board: BoardConfig::new(4, 7),
            ..Default::default()
        };

        assert!(matches!(
            Session::from_board(config, board_from(7, &BACKGROUND), ScriptedSource::new(&[0])),
            Err(GameError::InvalidBoardShape)
        ));
    }

    #[test]
    fn from_board_rejects_empty_cells() {
        let mut rows = BACKGROUND;
        rows[0] = "0241302.";

        assert!(matches!(
            Session::from_board(
                SessionConfig::default(),
                board_from(7, &rows),
                ScriptedSource::new(&[0])
            ),
            Err(GameError::EmptyCells)
        ));
    }

    #[test]
    fn zero_budgets_still_leave_a_playable_session() {
        let config = SessionConfig {
            initial_moves: 0,
            win_score: 0,
            ..Default::default()
        };
        let mut session =
            Session::from_board(config, board_from(7, &END_TO_END), ScriptedSource::new(&[5, 6, 5]))
                .unwrap();

        assert_eq!(session.moves_left(), 1);
        assert_eq!(session.state(), SessionState::Playing);

        session.swap(Swap::new((3, 3), (3, 4)).unwrap()).unwrap();

        assert_eq!(session.moves_left(), 0);
        assert_eq!(session.state(), SessionState::Won);
    }

    #[test]
    fn seeded_sessions_replay_identically() {
        let mut a = Session::new(SessionConfig::default(), 1234);
        let mut b = Session::new(SessionConfig::default(), 1234);

        for _ in 0..10 {
            let Hint::Swap(swap) = a.hint() else {
                break;
            };
            assert_eq!(a.swap(swap), b.swap(swap));
        }
        assert_eq!(a.board(), b.board());
        assert_eq!(a.score(), b.score());
    }
}
