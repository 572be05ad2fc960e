//! Debounce filter management for the button input.

use crate::pins::{PinBackend, PinId};

/// Filter window applied whenever debouncing is enabled, in milliseconds.
pub const DEBOUNCE_WINDOW_MS: u32 = 300;

/// Applies or removes the debounce filter on the button pin.
///
/// The existing filter is always fully removed first so two windows never
/// overlap; enabling then programs the fixed default window. The
/// transition is deliberately not atomic with respect to concurrent button
/// presses: an edge arriving mid-transition may be seen unfiltered. That
/// is an accepted property of the controller and must not be papered over
/// with locking, which would change its observable timing.
pub(crate) fn apply<P: PinBackend>(pins: &mut P, button: PinId, enabled: bool) {
    pins.set_debounce_window(button, 0);
    if enabled {
        pins.set_debounce_window(button, DEBOUNCE_WINDOW_MS);
        info!("debounce on, {} ms window", DEBOUNCE_WINDOW_MS);
    } else {
        info!("debounce off");
    }
}
