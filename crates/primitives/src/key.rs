//! Member key codec.
//!
//! A member key packs two 32-bit fields into one `u64`:
//!
//! ```text
//!  63                 32 31                  0
//! +---------------------+---------------------+
//! |  !(elapsed mod 2^32) |         uid         |
//! +---------------------+---------------------+
//! ```
//!
//! The store orders equal scores by member, and descending queries walk that
//! order backwards. Complementing the elapsed time makes an earlier update
//! produce a larger key, so among equal scores the participant who got there
//! first is listed first. Elapsed time wraps after 2^32 units of the
//! ranking's [`TimeMode`](crate::TimeMode).
//!
//! Stores compare members as byte strings, so keys are written as fixed-width
//! zero-padded decimal ([`MemberKey::WIDTH`] digits) to keep text order equal
//! to numeric order.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Uid;

const UID_MASK: u64 = u32::MAX as u64;

/// Sort and tie-break token stored in the ranking's sorted set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberKey(u64);

/// A sorted-set member that is not a decimal `u64`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("malformed member key: {0:?}")]
pub struct KeyParseError(pub String);

impl MemberKey {
    /// Digits in the stored form; `u64::MAX` has 20.
    pub const WIDTH: usize = 20;

    /// Pack `uid` with the truncated, complemented elapsed time.
    pub const fn encode(uid: Uid, elapsed: u64) -> Self {
        let recency = !(elapsed as u32);
        Self(((recency as u64) << 32) | uid.get() as u64)
    }

    /// Recover the identity. The time half is ignored.
    pub const fn uid(self) -> Uid {
        Uid::new((self.0 & UID_MASK) as u32)
    }

    /// The complemented elapsed time held in the high half.
    pub const fn recency(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// The packed value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Parse the decimal member form used by the store. Leading zeros are accepted.
    pub fn parse(member: &str) -> Result<Self, KeyParseError> {
        member
            .parse::<u64>()
            .map(Self)
            .map_err(|_| KeyParseError(member.to_owned()))
    }
}

impl From<u64> for MemberKey {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.0, width = Self::WIDTH)
    }
}

impl FromStr for MemberKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
