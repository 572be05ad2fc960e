#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`ButtonController`**: owns the hardware, handles edges, serves attribute traffic
//! - **`ControllerState`**: the shared record of counts, flags and timestamps
//! - **`PinBackend`**: trait to implement for your GPIO hardware
//! - **`Clock`**: trait to implement for your monotonic time source
//! - **`AttributeHost`**: trait to implement for your attribute-tree infrastructure
//! - **`Attribute`**: the five named endpoints and their access modes
//! - **`EdgeAck`**: acknowledgment the edge handler returns to the dispatcher
//!
//! The event handler is non-blocking and infallible; it may be invoked from
//! an interrupt-like context while attribute reads and writes run
//! concurrently from ordinary contexts. Scalar state lives in atomics and
//! the timestamp/interval pair behind a `critical-section` guard, so no
//! reader ever observes a torn update.

#[macro_use]
mod fmt;

pub mod attrs;
pub mod controller;
pub mod debounce;
pub mod pins;
pub mod state;
pub mod time;

pub use attrs::{Access, AttrValue, Attribute, AttributeError, AttributeHost, AttributeHostError};
pub use controller::{ButtonController, EdgeAck, StartupError};
pub use debounce::DEBOUNCE_WINDOW_MS;
pub use pins::{Direction, EdgePolarity, IrqHandle, PinBackend, PinError, PinId};
pub use state::{ControllerState, EventTiming, PinConfig};
pub use time::{Clock, TimeDelta, Timestamp};
