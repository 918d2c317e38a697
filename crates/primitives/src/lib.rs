//! Primitive types shared by every podium crate.
//!
//! - [`Uid`] - 32-bit participant identity, range-checked at the boundary
//! - [`MemberKey`] - the packed (recency, uid) token stored in the sorted set
//! - [`TimeMode`] - precision used to measure elapsed time
//! - [`Clock`] - injectable source of the current instant

mod key;
mod time;
mod uid;

pub use key::{KeyParseError, MemberKey};
pub use time::{Clock, SystemClock, TimeMode, default_start_time};
pub use uid::{ParseUidError, Uid, UidOutOfRange};

#[cfg(any(test, feature = "test-utils"))]
pub use time::ManualClock;
