//! Time abstraction for event timestamp and interval bookkeeping.

/// Trait for abstracting monotonic time sources.
///
/// Implementations must be monotonic: successive calls to [`Clock::now`]
/// never go backwards. The controller relies on this when computing the
/// interval between consecutive button events.
pub trait Clock {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}

/// A point in time with nanosecond precision, split into whole seconds
/// and a sub-second nanosecond component (always `< 1_000_000_000`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp {
    secs: u64,
    nanos: u32,
}

/// A non-negative span between two [`Timestamp`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeDelta {
    secs: u64,
    nanos: u32,
}

pub(crate) const NANOS_PER_SEC: u32 = 1_000_000_000;

impl Timestamp {
    /// The zero timestamp (epoch of the clock).
    pub const ZERO: Self = Timestamp { secs: 0, nanos: 0 };

    /// Creates a timestamp, carrying nanosecond overflow into seconds.
    pub const fn new(secs: u64, nanos: u32) -> Self {
        Timestamp {
            secs: secs + (nanos / NANOS_PER_SEC) as u64,
            nanos: nanos % NANOS_PER_SEC,
        }
    }

    /// Whole-second component.
    pub const fn secs(&self) -> u64 {
        self.secs
    }

    /// Sub-second nanosecond component (`< 1_000_000_000`).
    pub const fn subsec_nanos(&self) -> u32 {
        self.nanos
    }

    /// Span since an earlier timestamp.
    ///
    /// Saturates to [`TimeDelta::ZERO`] if `earlier` is actually later,
    /// which cannot happen with a monotonic [`Clock`] but keeps the
    /// arithmetic total.
    pub fn duration_since(&self, earlier: Self) -> TimeDelta {
        if *self < earlier {
            return TimeDelta::ZERO;
        }
        let (secs, nanos) = if self.nanos >= earlier.nanos {
            (self.secs - earlier.secs, self.nanos - earlier.nanos)
        } else {
            // Borrow one second for the nanosecond subtraction.
            (
                self.secs - earlier.secs - 1,
                NANOS_PER_SEC - (earlier.nanos - self.nanos),
            )
        };
        TimeDelta { secs, nanos }
    }
}

impl TimeDelta {
    /// Zero span.
    pub const ZERO: Self = TimeDelta { secs: 0, nanos: 0 };

    /// Whole-second component.
    pub const fn secs(&self) -> u64 {
        self.secs
    }

    /// Sub-second nanosecond component (`< 1_000_000_000`).
    pub const fn subsec_nanos(&self) -> u32 {
        self.nanos
    }
}
