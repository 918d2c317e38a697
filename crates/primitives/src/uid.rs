//! Participant identity.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A participant's identity.
///
/// Member keys reserve only the low 32 bits for the identity, so wider values
/// are rejected here instead of aliasing another participant.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Uid(u32);

/// Returned when an identity does not fit in 32 bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("uid {0} exceeds the 32-bit identity range")]
pub struct UidOutOfRange(pub u64);

impl Uid {
    /// Create a uid from its 32-bit value.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// The raw 32-bit value.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for Uid {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl TryFrom<u64> for Uid {
    type Error = UidOutOfRange;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .map(Self)
            .map_err(|_| UidOutOfRange(value))
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Parse error for [`Uid`] from text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseUidError {
    /// Not an unsigned integer.
    #[error("invalid uid: {0}")]
    Invalid(String),
    /// Integer wider than 32 bits.
    #[error(transparent)]
    OutOfRange(#[from] UidOutOfRange),
}

impl FromStr for Uid {
    type Err = ParseUidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wide: u64 = s
            .trim()
            .parse()
            .map_err(|_| ParseUidError::Invalid(s.to_owned()))?;
        Ok(Self::try_from(wide)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_rejects_wide_values() {
        assert_eq!(Uid::try_from(7u64), Ok(Uid::new(7)));
        assert_eq!(Uid::try_from(u64::from(u32::MAX)), Ok(Uid::new(u32::MAX)));
        assert_eq!(
            Uid::try_from(u64::from(u32::MAX) + 1),
            Err(UidOutOfRange(u64::from(u32::MAX) + 1))
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!("42".parse::<Uid>().unwrap(), Uid::new(42));
        assert!(matches!(
            "4294967296".parse::<Uid>(),
            Err(ParseUidError::OutOfRange(_))
        ));
        assert!(matches!("abc".parse::<Uid>(), Err(ParseUidError::Invalid(_))));
    }
}
