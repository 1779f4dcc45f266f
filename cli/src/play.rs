use std::io::{BufRead, Write};

use anyhow::{Result, anyhow, bail};
use matchling_core::{
    Board, CascadeStep, Coord, Coord2, GameError, RandomSource, Session, SessionState, Swap, SwapValidation,
};

use crate::render::{self, BoardView};

#[derive(Copy, Clone, Debug, PartialEq)]
enum Command {
    Swap(Coord2, Coord2),
    Hint,
    Reset,
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            bail!("empty command");
        };

        let command = match verb {
            "swap" | "s" => {
                let numbers = words
                    .by_ref()
                    .map(|word| word.parse::<Coord>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|err| anyhow!("bad coordinate: {err}"))?;
                let [r1, c1, r2, c2] = numbers[..] else {
                    bail!("swap takes four numbers: row col row col");
                };
                Command::Swap((r1, c1), (r2, c2))
            }
            "hint" | "h" => Command::Hint,
            "reset" | "r" => Command::Reset,
            "help" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => bail!("unknown command '{other}', try 'help'"),
        };

        if words.next().is_some() {
            bail!("too many arguments for '{verb}'");
        }
        Ok(command)
    }
}

const HELP: &str = "\
commands:
  swap R1 C1 R2 C2   swap two adjacent tiles (alias: s)
  hint               highlight a playable swap (alias: h)
  reset              start over with a new board (alias: r)
  quit               leave (alias: q)
";

/// Reads commands from `input` until it ends or the player quits, writing the board after every change.
pub fn run<S, R, W>(session: &mut Session<S>, input: R, mut out: W) -> Result<()>
where
    S: RandomSource,
    R: BufRead,
    W: Write,
{
    show(session, &mut out, &[])?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };

        match command {
            Command::Swap(a, b) => play_swap(session, a, b, &mut out)?,
            Command::Hint => {
                let hint = session.hint();
                if !hint.is_playable() {
                    writeln!(out, "no moves left on this board, try 'reset'")?;
                }
                show(session, &mut out, &hint.positions())?;
            }
            Command::Reset => {
                session.reset();
                show(session, &mut out, &[])?;
            }
            Command::Help => write!(out, "{HELP}")?,
            Command::Quit => break,
        }
    }

    writeln!(out, "final {}", render::status(session))?;
    Ok(())
}

fn play_swap<S: RandomSource, W: Write>(
    session: &mut Session<S>,
    a: Coord2,
    b: Coord2,
    out: &mut W,
) -> Result<()> {
    let swap = match checked_swap(session.board(), a, b) {
        Ok(swap) => swap,
        Err(err) => {
            writeln!(out, "{err}")?;
            return Ok(());
        }
    };

    match session.begin_swap(swap) {
        Ok(SwapValidation::Ineffective) => {
            writeln!(out, "no match, swap undone")?;
            return Ok(());
        }
        Ok(SwapValidation::Effective(_)) => {}
        Err(err @ (GameError::AlreadyEnded | GameError::Busy)) => {
            writeln!(out, "{err}")?;
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    }

    while let Some(step) = session.step() {
        match step {
            CascadeStep::Scored {
                round,
                groups,
                score_delta,
            } => writeln!(
                out,
                "round {}: {} group(s), +{}",
                round + 1,
                groups.len(),
                score_delta
            )?,
            CascadeStep::Settled(report) if report.rounds.len() > 1 => {
                writeln!(out, "cascade of {} rounds!", report.rounds.len())?
            }
            _ => {}
        }
    }

    show(session, out, &[])?;
    match session.state() {
        SessionState::Won => writeln!(out, "you win with {} points!", session.score())?,
        SessionState::Lost => writeln!(out, "out of moves, game over")?,
        SessionState::Playing => {}
    }
    Ok(())
}

/// Both positions must be on the board and next to each other before the engine sees the swap.
fn checked_swap(board: &Board, a: Coord2, b: Coord2) -> matchling_core::Result<Swap> {
    Swap::new(board.validate_coords(a)?, board.validate_coords(b)?)
}

fn show<S: RandomSource, W: Write>(
    session: &Session<S>,
    out: &mut W,
    highlight: &[Coord2],
) -> Result<()> {
    let view = BoardView::new(session.board(), &session.config().alphabet).highlight(highlight);
    write!(out, "{view}")?;
    writeln!(out, "{}", render::status(session))?;
    Ok(())
}
