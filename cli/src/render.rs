use std::fmt;

use matchling_core::{Alphabet, Board, Cell, Coord2, RandomSource, Session};

/// Text projection of the board, one glyph per token.
pub struct BoardView<'a> {
    board: &'a Board,
    alphabet: &'a Alphabet,
    highlight: &'a [Coord2],
}

impl<'a> BoardView<'a> {
    pub fn new(board: &'a Board, alphabet: &'a Alphabet) -> Self {
        Self {
            board,
            alphabet,
            highlight: &[],
        }
    }

    pub fn highlight(mut self, positions: &'a [Coord2]) -> Self {
        self.highlight = positions;
        self
    }
}

impl fmt::Display for BoardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.board.size();

        let mut line = String::from("    ");
        for col in 0..size {
            line.push_str(&format!("{:^3}", col));
        }
        writeln!(f, "{}", line.trim_end())?;

        for row in 0..size {
            let mut line = format!("{:>3} ", row);
            for (col, cell) in (0..size).zip(self.board.row(row)) {
                let glyph = match cell {
                    Cell::Empty => '.',
                    Cell::Filled(token) => self.alphabet.glyph(token),
                };
                if self.highlight.contains(&(row, col)) {
                    line.push_str(&format!("[{}]", glyph));
                } else {
                    line.push_str(&format!(" {} ", glyph));
                }
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

pub fn status<S: RandomSource>(session: &Session<S>) -> String {
    format!(
        "score {}  moves {}  level {}",
        session.score(),
        session.moves_left(),
        session.level()
    )
}
