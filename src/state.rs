//! Shared controller state.
//!
//! [`ControllerState`] is the single record mutated by the event handler
//! and read (and partially written) through the attribute layer, possibly
//! concurrently. Independent fields are atomics; the timestamp/interval
//! pair lives behind a `critical-section` mutex so a reader never observes
//! a torn combination of the two.

use core::cell::Cell;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use critical_section::Mutex;

use crate::pins::{EdgePolarity, PinId};
use crate::time::{TimeDelta, Timestamp};

/// Pin assignment and edge polarity, fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// Button input pin.
    pub button: PinId,
    /// LED output pin.
    pub led: PinId,
    /// Which transition on the button pin counts as a press.
    pub edge: EdgePolarity,
}

impl Default for PinConfig {
    fn default() -> Self {
        PinConfig {
            button: PinId(27),
            led: PinId(17),
            edge: EdgePolarity::Rising,
        }
    }
}

/// Timestamp of the most recent event and the span to the one before it.
///
/// Always read and written as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventTiming {
    /// When the most recent qualifying edge occurred.
    pub last_event_time: Timestamp,
    /// Span between the two most recent qualifying edges.
    pub event_interval: TimeDelta,
}

/// The shared record of counts, flags and timestamps.
///
/// Exactly one instance exists per active controller; it is created during
/// startup and dropped after shutdown has released the hardware. All
/// mutation goes through `&self` so the event handler and concurrent
/// attribute readers can share it. Atomic accesses use relaxed ordering:
/// each field is an independent value with no cross-field ordering
/// requirement, except the time pair which the mutex covers.
pub struct ControllerState {
    press_count: AtomicU32,
    led_on: AtomicBool,
    debounce_enabled: AtomicBool,
    timing: Mutex<Cell<EventTiming>>,
    pin_config: PinConfig,
}

impl ControllerState {
    /// Creates the startup state: zero presses, LED on, debounce enabled,
    /// last event time set to `now` and a zero interval.
    pub fn new(pin_config: PinConfig, now: Timestamp) -> Self {
        ControllerState {
            press_count: AtomicU32::new(0),
            led_on: AtomicBool::new(true),
            debounce_enabled: AtomicBool::new(true),
            timing: Mutex::new(Cell::new(EventTiming {
                last_event_time: now,
                event_interval: TimeDelta::ZERO,
            })),
            pin_config,
        }
    }

    /// Number of qualifying events seen, unless overridden externally.
    pub fn press_count(&self) -> u32 {
        self.press_count.load(Ordering::Relaxed)
    }

    /// Replaces the press count (attribute write path).
    pub fn set_press_count(&self, count: u32) {
        self.press_count.store(count, Ordering::Relaxed);
    }

    /// Increments the press count, wrapping at `u32::MAX`. Returns the
    /// post-increment value.
    pub fn increment_press_count(&self) -> u32 {
        self.press_count.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    /// Current LED state.
    pub fn led_on(&self) -> bool {
        self.led_on.load(Ordering::Relaxed)
    }

    /// Inverts the LED state. Returns the new value.
    ///
    /// Only the event handler calls this; it is the single place the LED
    /// state changes after startup.
    pub fn toggle_led(&self) -> bool {
        !self.led_on.fetch_xor(true, Ordering::Relaxed)
    }

    /// Whether the debounce filter is currently requested.
    pub fn debounce_enabled(&self) -> bool {
        self.debounce_enabled.load(Ordering::Relaxed)
    }

    /// Records the debounce configuration (the filter itself is programmed
    /// by the debounce manager).
    pub fn set_debounce_enabled(&self, enabled: bool) {
        self.debounce_enabled.store(enabled, Ordering::Relaxed);
    }

    /// Snapshot of the timestamp/interval pair.
    pub fn timing(&self) -> EventTiming {
        critical_section::with(|cs| self.timing.borrow(cs).get())
    }

    /// Records a qualifying event at `now`: computes the interval since
    /// the previous event and stores the new pair in one critical section.
    /// Returns the computed interval.
    pub fn record_event(&self, now: Timestamp) -> TimeDelta {
        critical_section::with(|cs| {
            let cell = self.timing.borrow(cs);
            let previous = cell.get();
            let interval = now.duration_since(previous.last_event_time);
            cell.set(EventTiming {
                last_event_time: now,
                event_interval: interval,
            });
            interval
        })
    }

    /// Pin assignment, immutable after startup.
    pub fn pin_config(&self) -> PinConfig {
        self.pin_config
    }
}
