use super::*;

/// Draw budget per cell used by the default generator.
pub const DEFAULT_DRAW_ATTEMPTS: u8 = 60;

/// Fills the board in row-major order with uniformly drawn tokens, redrawing any token that would complete a run
/// of three with the two cells before it in its row or column.
///
/// The redraw budget is finite on purpose: with few kinds every candidate can be blocked, so once the budget is
/// spent the last draw is kept even if it completes a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RandomBoardGenerator {
    max_attempts: u8,
}

impl RandomBoardGenerator {
    pub fn new(max_attempts: u8) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }
}

impl Default for RandomBoardGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_DRAW_ATTEMPTS)
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate<S: RandomSource + ?Sized>(&self, config: BoardConfig, source: &mut S) -> Board {
        let mut board = Board::empty(config);

        for coords in board.iter_coords() {
            let token = draw_token(&board, coords, self.max_attempts, source);
            board.set(coords, Cell::Filled(token));
        }

        let runs = find_matches(&board).len();
        if runs > 0 {
            log::warn!(
                "Generated board has {} pre-existing run(s), {} kinds on {}x{}",
                runs,
                config.kinds,
                config.size,
                config.size
            );
        }
        board
    }
}

/// Draws a token for `coords`, retrying up to `max_attempts` draws in total while the candidate would complete a
/// run with the two cells to its left or the two cells above it.
///
/// Only cells already on the board are considered, which is what lets refill reuse this against a partially
/// filled column.
pub fn draw_token<S: RandomSource + ?Sized>(
    board: &Board,
    coords: Coord2,
    max_attempts: u8,
    source: &mut S,
) -> Token {
    let kinds = board.kinds();
    let mut token = Token::new(source.draw(kinds));

    for _ in 1..max_attempts {
        if !completes_run(board, coords, token) {
            return token;
        }
        token = Token::new(source.draw(kinds));
    }

    if completes_run(board, coords, token) {
        log::trace!(
            "Draw attempts exhausted at {:?}, keeping {:?}",
            coords,
            token
        );
    }
    token
}

fn completes_run(board: &Board, (row, col): Coord2, token: Token) -> bool {
    let horizontal =
        col >= 2 && board[(row, col - 1)].holds(token) && board[(row, col - 2)].holds(token);
    let vertical =
        row >= 2 && board[(row - 1, col)].holds(token) && board[(row - 2, col)].holds(token);
    horizontal || vertical
}
