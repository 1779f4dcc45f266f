use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use matchling_core::SessionConfig;

/// Loads session rules from a TOML file, falling back to the defaults when no file is given.
pub fn load(path: Option<&Path>) -> Result<SessionConfig> {
    let Some(path) = path else {
        return Ok(SessionConfig::default());
    };

    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse(&text).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn parse(text: &str) -> Result<SessionConfig> {
    let config: SessionConfig = toml::from_str(text)?;
    if config.alphabet.len() < usize::from(config.board.kinds) {
        log::warn!(
            "Alphabet names {} of {} kinds, the rest render as '?'",
            config.alphabet.len(),
            config.board.kinds
        );
    }
    Ok(config.normalized())
}
