//! # **TimeUnits Module** - *Temporal resolution tags*
//!
//! Resolution tags carried by the temporal `DataType` variants and by
//! `DatetimeArray`. Physical storage is always a raw integer offset; the unit
//! assigns its meaning.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Resolution of a timestamp or duration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    /// Whole days since the epoch (`Date32` physical unit).
    Days,
    Seconds,
    Milliseconds,
    Microseconds,
    Nanoseconds,
}

impl TimeUnit {
    /// Short lowercase suffix used in rendered type names.
    pub fn suffix(&self) -> &'static str {
        match self {
            TimeUnit::Days => "d",
            TimeUnit::Seconds => "s",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Microseconds => "us",
            TimeUnit::Nanoseconds => "ns",
        }
    }
}

impl Display for TimeUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.suffix())
    }
}
