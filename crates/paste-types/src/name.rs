use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// User-chosen, unique identifier of a paste.
///
/// Names are compared byte-for-byte; no case folding or normalization is
/// applied. A `PasteName` can only be obtained through [`PasteName::parse`],
/// so every value in circulation satisfies the naming rules.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PasteName(String);

impl PasteName {
    /// Maximum name length, in characters.
    pub const MAX_LEN: usize = 128;

    /// Validate and wrap a name.
    pub fn parse(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(TypeError::EmptyName);
        }
        let len = name.chars().count();
        if len > Self::MAX_LEN {
            return Err(TypeError::NameTooLong {
                len,
                max: Self::MAX_LEN,
            });
        }
        if name.chars().any(char::is_control) {
            return Err(TypeError::ControlCharacter);
        }
        if name.trim() != name {
            return Err(TypeError::SurroundingWhitespace);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PasteName({:?})", self.0)
    }
}

impl fmt::Display for PasteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PasteName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<PasteName> for String {
    fn from(name: PasteName) -> Self {
        name.0
    }
}

impl AsRef<str> for PasteName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
