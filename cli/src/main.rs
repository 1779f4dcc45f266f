use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use matchling_core::Session;

mod config;
mod play;
mod render;
mod simulate;

#[derive(Parser, Debug)]
#[command(version, about = "Match-3 board engine in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play interactively, reading commands from stdin.
    Play(SessionArgs),
    /// Auto-play sessions by always taking the hint and report the results.
    Simulate {
        #[command(flatten)]
        session: SessionArgs,
        /// Number of sessions to play; session `i` uses seed `seed + i`.
        #[arg(long, default_value_t = 100)]
        games: u64,
        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct SessionArgs {
    /// Seed for the board and refills; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file overriding the default session rules.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl SessionArgs {
    fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    match cli.command {
        Command::Play(args) => {
            let config = config::load(args.config.as_deref())?;
            let seed = args.seed();
            log::info!("Playing with seed {}", seed);
            let mut session = Session::new(config, seed);
            play::run(&mut session, io::stdin().lock(), io::stdout().lock())
        }
        Command::Simulate {
            session,
            games,
            json,
        } => {
            let config = config::load(session.config.as_deref())?;
            let summary = simulate::run(&config, session.seed(), games);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", summary);
            }
            Ok(())
        }
    }
}
