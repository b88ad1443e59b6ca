//! Simulation time model.
//!
//! # Design
//!
//! The canonical time unit is one **tick = one simulated minute**.  A day is
//! therefore exactly [`TICKS_PER_DAY`] = 1,440 ticks, and all schedule
//! arithmetic is exact integer math (no floating-point drift).
//!
//! Two views of time coexist:
//!
//! - [`Tick`] — the absolute, monotonically increasing counter across the
//!   whole run.
//! - [`TimeOfDay`] — the position within the current day, `0..1440`.  The
//!   day loop hands this to every agent decision; schedules are expressed as
//!   [`TimeWindow`]s over it and may wrap past midnight.

use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Ticks in one simulated day (minutes).
pub const TICKS_PER_DAY: u32 = 1_440;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
///
/// Stored as `u64`: at one tick per simulated minute a u64 outlasts any
/// conceivable run by a comfortable 30 orders of magnitude.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// The day this tick falls in (day 0 starts at tick 0).
    #[inline]
    pub fn day(self) -> u64 {
        self.0 / TICKS_PER_DAY as u64
    }

    /// The position of this tick within its day.
    #[inline]
    pub fn time_of_day(self) -> TimeOfDay {
        TimeOfDay((self.0 % TICKS_PER_DAY as u64) as u16)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── TimeOfDay ────────────────────────────────────────────────────────────────

/// Minutes past midnight, always in `0..TICKS_PER_DAY`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeOfDay(pub u16);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Build from whole hours (`0..24`).
    ///
    /// # Panics
    /// Panics in debug mode if `hours >= 24`.
    #[inline]
    pub fn from_hours(hours: u16) -> TimeOfDay {
        debug_assert!(hours < 24, "hours must be < 24");
        TimeOfDay(hours * 60)
    }

    /// Parse a time string of the form `HH`, `HH:MM`, or `HH:MM:SS` into
    /// minutes past midnight.  Seconds are truncated to whole minutes.
    ///
    /// Accepts one- or two-digit components; rejects anything that does not
    /// land inside a single day.
    pub fn parse(s: &str) -> CoreResult<TimeOfDay> {
        let mut parts = s.split(':');
        let parse_field = |field: Option<&str>, what: &str| -> CoreResult<u32> {
            match field {
                None => Ok(0),
                Some(f) => f
                    .parse::<u32>()
                    .map_err(|_| CoreError::Parse(format!("bad {what} in time string {s:?}"))),
            }
        };
        let h = parse_field(parts.next(), "hours")?;
        let m = parse_field(parts.next(), "minutes")?;
        let sec = parse_field(parts.next(), "seconds")?;
        if parts.next().is_some() {
            return Err(CoreError::Parse(format!(
                "time string {s:?} is not of the form HH, HH:MM, or HH:MM:SS"
            )));
        }

        let minutes = h * 60 + m + sec / 60;
        if h >= 24 || m >= 60 || sec >= 60 || minutes >= TICKS_PER_DAY {
            return Err(CoreError::Parse(format!("time string {s:?} exceeds one day")));
        }
        Ok(TimeOfDay(minutes as u16))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

// ── TimeWindow ───────────────────────────────────────────────────────────────

/// An inclusive time-of-day interval that may wrap past midnight.
///
/// `begin > end` means the window spans midnight: a 22:00–08:00 sleep
/// schedule contains 23:59 and 00:00 but not 12:00.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeWindow {
    pub begin: TimeOfDay,
    pub end:   TimeOfDay,
}

impl TimeWindow {
    #[inline]
    pub fn new(begin: TimeOfDay, end: TimeOfDay) -> Self {
        Self { begin, end }
    }

    /// A window starting at `begin` and lasting `duration` ticks, wrapping
    /// past midnight if needed.
    pub fn starting_at(begin: TimeOfDay, duration: u32) -> Self {
        let end = (begin.0 as u32 + duration) % TICKS_PER_DAY;
        Self { begin, end: TimeOfDay(end as u16) }
    }

    /// `true` if `t` lies inside the window (both endpoints inclusive).
    #[inline]
    pub fn contains(&self, t: TimeOfDay) -> bool {
        if self.begin > self.end {
            // Spans the midnight hour.
            t >= self.begin || t <= self.end
        } else {
            t >= self.begin && t <= self.end
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.begin, self.end)
    }
}
