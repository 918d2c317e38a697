//! Calendar-scoped rankings (daily, monthly, yearly boards).
//!
//! A periodic board is an ordinary ranking whose name carries the period and
//! whose epoch is the period's first instant. Clearing the previous period's
//! board is a [`Ranking::remove_all`](crate::Ranking::remove_all) on the name
//! returned by [`Period::previous_name`].

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use podium_primitives::TimeMode;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::RankingOption;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Monthly,
    Yearly,
}

impl Period {
    /// First day of the period containing `date`.
    pub fn start(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Daily => date,
            Self::Monthly => date.with_day(1).unwrap_or(date),
            Self::Yearly => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        }
    }

    /// First day of the period before the one containing `date`.
    pub fn previous(self, date: NaiveDate) -> NaiveDate {
        let start = self.start(date);
        match start.pred_opt() {
            Some(last_of_previous) => self.start(last_of_previous),
            None => start,
        }
    }

    /// Epoch of the period containing `date`, midnight UTC.
    pub fn start_time(self, date: NaiveDate) -> DateTime<Utc> {
        self.start(date).and_time(NaiveTime::MIN).and_utc()
    }

    /// Board name for the period containing `date`, e.g. `base_2024_3` for March.
    pub fn name(self, base: &str, date: NaiveDate) -> String {
        let start = self.start(date);
        match self {
            Self::Daily => format!("{base}_{}_{}_{}", start.year(), start.month(), start.day()),
            Self::Monthly => format!("{base}_{}_{}", start.year(), start.month()),
            Self::Yearly => format!("{base}_{}", start.year()),
        }
    }

    /// Board name of the period before the one containing `date`.
    pub fn previous_name(self, base: &str, date: NaiveDate) -> String {
        self.name(base, self.previous(date))
    }

    /// Finest time mode whose 32-bit elapsed field does not wrap within one period.
    pub const fn finest_mode(self) -> TimeMode {
        match self {
            // Nanosecond "microsecond" mode wraps after ~4.3s, so days use milliseconds.
            Self::Daily | Self::Monthly => TimeMode::Millisecond,
            Self::Yearly => TimeMode::Second,
        }
    }

    /// Options opening the board of the period containing `date`.
    pub fn options(self, base: &str, date: NaiveDate) -> [RankingOption; 3] {
        [
            RankingOption::Name(self.name(base, date)),
            RankingOption::StartTime(self.start_time(date)),
            RankingOption::TimeMode(self.finest_mode()),
        ]
    }
}
