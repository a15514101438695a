use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Endpoint family a topic belongs to.
///
/// The server exposes one wire contract for aptitude topics and another for
/// DSA topics; the client is otherwise identical across the two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    Aptitude,
    Dsa,
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Track::Aptitude => write!(f, "aptitude"),
            Track::Dsa => write!(f, "dsa"),
        }
    }
}

/// Error type for parsing a track name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTrackError {
    raw: String,
}

impl fmt::Display for ParseTrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown track: {}", self.raw)
    }
}

impl std::error::Error for ParseTrackError {}

impl FromStr for Track {
    type Err = ParseTrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aptitude" | "apti" => Ok(Track::Aptitude),
            "dsa" => Ok(Track::Dsa),
            _ => Err(ParseTrackError { raw: s.to_string() }),
        }
    }
}
