//! # Date and Timestamp
//!
//! Both are fixed-width scalars. `Timestamp` is signed milliseconds since the
//! Unix epoch; it orders correctly under integer comparison but carries no
//! time zone. `Date` packs a calendar day as `year * 10000 + month * 100 + day`
//! in an `i32`, so packed dates also sort chronologically.

use std::fmt;

use eyre::{ensure, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub const fn millis(&self) -> i64 {
        self.0
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Self(millis)
    }
}

const MAX_YEAR: i32 = i32::MAX / 10000 - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Date(i32);

impl Date {
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self> {
        ensure!(
            (1..=12).contains(&month),
            "invalid month {} in date {}-{}-{}",
            month,
            year,
            month,
            day
        );
        ensure!(
            (1..=31).contains(&day),
            "invalid day {} in date {}-{}-{}",
            day,
            year,
            month,
            day
        );
        ensure!(
            (0..=MAX_YEAR).contains(&year),
            "year {} outside packed date range 0..={}",
            year,
            MAX_YEAR
        );
        Ok(Self(year * 10000 + month as i32 * 100 + day as i32))
    }

    /// Wraps an already packed value without validation, as read off the wire.
    pub const fn from_packed(packed: i32) -> Self {
        Self(packed)
    }

    pub const fn packed(&self) -> i32 {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0 / 10000
    }

    pub fn month(&self) -> u32 {
        ((self.0 / 100) % 100) as u32
    }

    pub fn day(&self) -> u32 {
        (self.0 % 100) as u32
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year(), self.month(), self.day())
    }
}
