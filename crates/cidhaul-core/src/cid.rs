use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A content identifier in one of the two recognized text shapes.
///
/// Version 0 is `Qm` followed by exactly 44 base58 characters (46
/// total); version 1 is `baf` followed by at least 50 base32
/// characters. Identifiers compare by exact string equality; no
/// canonicalization across versions is performed. The character
/// classes guarantee an identifier never contains `/` or whitespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cid(String);

#[derive(Debug, Error)]
#[error("not a recognized content identifier: {0:?}")]
pub struct ParseCidError(pub String);

impl Cid {
    /// Parse a string that must be exactly one identifier, with no
    /// surrounding text or URL scaffolding. Use
    /// [`find_cids`](crate::find_cids) for embedded identifiers.
    pub fn parse(s: &str) -> Result<Self, ParseCidError> {
        if is_v0(s) || is_v1(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(ParseCidError(s.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Cid {
    type Err = ParseCidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Cid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_v0(s: &str) -> bool {
    s.len() == 46
        && s.starts_with("Qm")
        && s.bytes().skip(2).all(|b| b.is_ascii_alphanumeric())
}

fn is_v1(s: &str) -> bool {
    s.len() >= 53
        && s.starts_with("baf")
        && s.bytes()
            .skip(3)
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v0(fill: char) -> String {
        format!("Qm{}", fill.to_string().repeat(44))
    }

    #[test]
    fn parses_v0() {
        let s = v0('A');
        let cid = Cid::parse(&s).unwrap();
        assert_eq!(cid.as_str(), s);
    }

    #[test]
    fn parses_v1() {
        let s = format!("baf{}", "y".repeat(52));
        assert!(Cid::parse(&s).is_ok());
    }

    #[test]
    fn rejects_v0_off_by_one() {
        assert!(Cid::parse(&format!("Qm{}", "A".repeat(43))).is_err());
        assert!(Cid::parse(&format!("Qm{}", "A".repeat(45))).is_err());
    }

    #[test]
    fn rejects_short_v1() {
        assert!(Cid::parse(&format!("baf{}", "y".repeat(49))).is_err());
    }

    #[test]
    fn rejects_path_and_scheme() {
        assert!(Cid::parse(&format!("ipfs://{}", v0('A'))).is_err());
        assert!(Cid::parse(&format!("{}/image.png", v0('A'))).is_err());
    }

    #[test]
    fn rejects_whitespace() {
        assert!(Cid::parse(&format!("Qm{} {}", "A".repeat(20), "A".repeat(23))).is_err());
    }

    #[test]
    fn from_str_round_trips_display() {
        let s = v0('b');
        let cid: Cid = s.parse().unwrap();
        assert_eq!(cid.to_string(), s);
    }
}
