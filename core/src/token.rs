use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// One token kind, an index into the session's [`Alphabet`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(u8);

impl Token {
    pub const fn new(kind: u8) -> Self {
        Self(kind)
    }

    pub const fn kind(self) -> u8 {
        self.0
    }
}

/// Content of a single board cell. `Empty` only exists while a cascade is being resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Filled(Token),
}

impl Cell {
    pub const fn token(self) -> Option<Token> {
        match self {
            Self::Empty => None,
            Self::Filled(token) => Some(token),
        }
    }

    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Empty cells never hold anything, so they never take part in a run.
    pub fn holds(self, token: Token) -> bool {
        self == Self::Filled(token)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Empty
    }
}

impl From<Token> for Cell {
    fn from(token: Token) -> Self {
        Self::Filled(token)
    }
}

const DEFAULT_NAMES: [&str; 7] = ["ember", "moss", "tide", "dusk", "frost", "bloom", "storm"];

/// Display names for token kinds, used by front ends to label tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Alphabet {
    names: Vec<String>,
}

impl Alphabet {
    pub fn new<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, token: Token) -> Option<&str> {
        self.names.get(usize::from(token.kind())).map(String::as_str)
    }

    /// Single-letter stand-in for a token whose artwork is unavailable: the first letter of its name, uppercased.
    pub fn glyph(&self, token: Token) -> char {
        self.name(token)
            .and_then(|name| name.chars().next())
            .and_then(|first| first.to_uppercase().next())
            .unwrap_or('?')
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::new(DEFAULT_NAMES)
    }
}
