//! Attribute exposure layer.
//!
//! The controller publishes its state as five named attributes under a
//! group derived from the button pin number (e.g. `gpio27`), conceptually a
//! filesystem-like namespace. This module owns the attribute catalog, the
//! text encodings read out of it, the decimal parsing applied to writes,
//! and the [`AttributeHost`] trait through which the host environment's
//! attribute-tree infrastructure is driven during startup and shutdown.

use core::fmt::Write;

use heapless::String;

use crate::pins::PinId;
use crate::state::ControllerState;

/// Rendered attribute payload, newline-terminated.
///
/// Sized for the largest rendering: `eventInterval` with a full-width
/// seconds component (`u64::MAX` is 20 digits, plus `.`, nine nanosecond
/// digits and the newline).
pub type AttrValue = String<32>;

/// Attribute group name, `gpio` followed by the button pin number.
pub type GroupName = String<16>;

/// Access mode of an attribute endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Access {
    /// Externally readable only.
    ReadOnly,
    /// Externally readable and writable.
    ReadWrite,
}

/// The named endpoints exposed by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Attribute {
    /// Number of qualifying button events (read-write).
    PressCount,
    /// Current LED state as `0`/`1` (read-only).
    LedOn,
    /// Wall-clock of the last event as `HH:MM:SS:NNNNNNNNN` (read-only).
    LastEventTime,
    /// Span between the last two events as `SECONDS.NNNNNNNNN` (read-only).
    EventInterval,
    /// Debounce filter state as `0`/`1` (read-write).
    DebounceEnabled,
}

impl Attribute {
    /// Every attribute, in registration order.
    pub const ALL: [Attribute; 5] = [
        Attribute::PressCount,
        Attribute::LedOn,
        Attribute::LastEventTime,
        Attribute::EventInterval,
        Attribute::DebounceEnabled,
    ];

    /// External name of the endpoint.
    pub const fn name(self) -> &'static str {
        match self {
            Attribute::PressCount => "pressCount",
            Attribute::LedOn => "ledOn",
            Attribute::LastEventTime => "lastEventTime",
            Attribute::EventInterval => "eventInterval",
            Attribute::DebounceEnabled => "debounceEnabled",
        }
    }

    /// Access mode of the endpoint.
    pub const fn access(self) -> Access {
        match self {
            Attribute::PressCount | Attribute::DebounceEnabled => Access::ReadWrite,
            _ => Access::ReadOnly,
        }
    }

    /// Looks an endpoint up by its external name.
    pub fn from_name(name: &str) -> Option<Attribute> {
        Attribute::ALL.into_iter().find(|attr| attr.name() == name)
    }
}

/// Errors surfaced by attribute reads and writes.
///
/// All of these are recovered locally: the controller's state is left
/// untouched and the caller (the host glue serving external readers and
/// writers) decides whether to surface or swallow them. Swallowing matches
/// the behavior external writers have historically seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AttributeError {
    /// No attribute with the given name.
    Unknown,
    /// Write attempted on a read-only attribute.
    ReadOnly,
    /// Write payload does not start with a decimal integer, or its
    /// magnitude overflows the parser.
    Malformed,
}

impl core::fmt::Display for AttributeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AttributeError::Unknown => write!(f, "unknown attribute"),
            AttributeError::ReadOnly => write!(f, "attribute is read-only"),
            AttributeError::Malformed => write!(f, "payload is not a decimal integer"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AttributeError {}

/// Error returned by the host attribute-tree infrastructure.
///
/// Opaque by design: the host keeps its own diagnostics, the controller
/// only needs to know which startup step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AttributeHostError;

impl core::fmt::Display for AttributeHostError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "attribute host operation failed")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AttributeHostError {}

/// Host-provided attribute-tree infrastructure.
///
/// The controller never implements the namespace itself; it registers its
/// group and endpoints with the host at startup and removes them at
/// shutdown. Implement this for your environment's registry (a sysfs-style
/// tree, an RPC parameter server, a test recorder, ...).
pub trait AttributeHost {
    /// Handle for a created group node.
    type Group;

    /// Creates the group node the controller's attributes live under.
    fn create_group(&mut self, name: &str) -> Result<Self::Group, AttributeHostError>;

    /// Registers one named endpoint under the group.
    fn register_attribute(
        &mut self,
        group: &Self::Group,
        name: &'static str,
        access: Access,
    ) -> Result<(), AttributeHostError>;

    /// Removes the group node and everything registered under it.
    fn remove_group(&mut self, group: Self::Group);
}

/// Derives the attribute group name from the button pin, e.g. `gpio27`.
pub fn group_name(button: PinId) -> GroupName {
    let mut name = GroupName::new();
    // "gpio" plus at most ten digits always fits the capacity.
    let _ = write!(name, "gpio{}", button.0);
    name
}

/// Renders an attribute's current value as newline-terminated text.
pub fn render(attr: Attribute, state: &ControllerState) -> AttrValue {
    let mut out = AttrValue::new();
    // Capacities are sized so none of these renderings can overflow.
    match attr {
        Attribute::PressCount => {
            let _ = writeln!(out, "{}", state.press_count());
        }
        Attribute::LedOn => {
            let _ = writeln!(out, "{}", u8::from(state.led_on()));
        }
        Attribute::LastEventTime => {
            let t = state.timing().last_event_time;
            let secs = t.secs();
            let _ = writeln!(
                out,
                "{:02}:{:02}:{:02}:{:09}",
                (secs / 3600) % 24,
                (secs / 60) % 60,
                secs % 60,
                t.subsec_nanos(),
            );
        }
        Attribute::EventInterval => {
            let d = state.timing().event_interval;
            let _ = writeln!(out, "{}.{:09}", d.secs(), d.subsec_nanos());
        }
        Attribute::DebounceEnabled => {
            let _ = writeln!(out, "{}", u8::from(state.debounce_enabled()));
        }
    }
    out
}

/// Parses the leading decimal integer of a write payload.
///
/// Accepts optional leading whitespace and an optional sign, requires at
/// least one ASCII digit, and ignores any trailing text after the digits
/// (scanf-style). Returns `None` for payloads with no leading integer or a
/// magnitude that overflows `i64`; negative values are later wrapped into
/// the attribute's unsigned width two's-complement style, so writing `-1`
/// to `pressCount` reads back as `4294967295`.
pub fn parse_decimal(payload: &str) -> Option<i64> {
    let bytes = payload.trim_start().as_bytes();
    let (negative, digits) = match *bytes.first()? {
        b'-' => (true, &bytes[1..]),
        b'+' => (false, &bytes[1..]),
        _ => (false, bytes),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for &b in digits {
        if !b.is_ascii_digit() {
            break;
        }
        seen = true;
        value = value
            .checked_mul(10)?
            .checked_add((b - b'0') as i64)?;
    }

    if !seen {
        return None;
    }
    Some(if negative { -value } else { value })
}
