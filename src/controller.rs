//! Button controller with lifecycle management and edge handling.
//!
//! Provides [`ButtonController`], which owns the pin backend, registers the
//! attribute group with the host, arms the button interrupt, and handles
//! each qualifying edge by toggling the LED and updating the shared state.

use crate::attrs::{self, AttrValue, Attribute, AttributeError, AttributeHost, GroupName};
use crate::debounce;
use crate::pins::{Direction, IrqHandle, PinBackend, PinError, PinId};
use crate::state::{ControllerState, PinConfig};
use crate::time::Clock;

/// Purpose label passed when reserving pins, marking them as acquired for
/// external visibility.
const PIN_PURPOSE: &str = "sysfs";

/// Acknowledgment returned by the edge handler.
///
/// The handler is infallible; the single variant exists so platform glue
/// has an explicit value to hand back to its interrupt dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeAck {
    /// The edge was processed.
    Handled,
}

/// Errors that abort startup.
///
/// Startup is fail-fast: whichever step fails, everything acquired before
/// it has already been released when this error is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartupError {
    /// The host refused to create the attribute group node.
    GroupCreation,
    /// The host refused to register the named attribute.
    AttributeRegistration {
        /// Name of the attribute that failed to register.
        name: &'static str,
    },
    /// A pin or interrupt acquisition failed.
    Pin(PinError),
}

impl From<PinError> for StartupError {
    fn from(err: PinError) -> Self {
        StartupError::Pin(err)
    }
}

impl core::fmt::Display for StartupError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StartupError::GroupCreation => {
                write!(f, "failed to create attribute group")
            }
            StartupError::AttributeRegistration { name } => {
                write!(f, "failed to register attribute {}", name)
            }
            StartupError::Pin(err) => write!(f, "pin acquisition failed: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StartupError {}

/// Interrupt-driven button-to-LED controller.
///
/// Created with [`ButtonController::start`], which acquires both pins,
/// publishes the attribute group and arms the button interrupt. The
/// platform glue then invokes [`ButtonController::handle_edge`] once per
/// qualifying edge, and serves external attribute traffic through
/// [`ButtonController::read_attribute`] and
/// [`ButtonController::write_attribute`]. Dropping the controller without
/// calling [`ButtonController::shutdown`] leaks the hardware reservations.
///
/// # Type Parameters
/// * `'c` - Lifetime of the clock reference
/// * `P` - Pin backend implementation
/// * `C` - Clock implementation
/// * `H` - Attribute host implementation
pub struct ButtonController<'c, P: PinBackend, C: Clock, H: AttributeHost> {
    pins: P,
    clock: &'c C,
    host: H,
    group: H::Group,
    group_name: GroupName,
    irq: IrqHandle,
    state: ControllerState,
}

impl<'c, P: PinBackend, C: Clock, H: AttributeHost> ButtonController<'c, P, C, H> {
    /// Acquires all resources and arms the button interrupt.
    ///
    /// Startup order: attribute group and endpoints, state initialization,
    /// LED pin (output, driven high, exported), button pin (input, default
    /// debounce window, exported), interrupt mapping, edge registration.
    /// Any failure releases everything acquired up to that point before
    /// returning.
    pub fn start(
        mut pins: P,
        clock: &'c C,
        mut host: H,
        config: PinConfig,
    ) -> Result<Self, StartupError> {
        info!(
            "starting button controller, button pin {} led pin {}",
            config.button.0,
            config.led.0
        );

        let group_name = attrs::group_name(config.button);
        let group = host
            .create_group(&group_name)
            .map_err(|_| StartupError::GroupCreation)?;

        for attr in Attribute::ALL {
            if host
                .register_attribute(&group, attr.name(), attr.access())
                .is_err()
            {
                host.remove_group(group);
                return Err(StartupError::AttributeRegistration { name: attr.name() });
            }
        }

        // LED is on by default; the state snapshot drives the pin level.
        let state = ControllerState::new(config, clock.now());

        if let Err(err) = pins.request_pin(config.led, PIN_PURPOSE) {
            host.remove_group(group);
            return Err(err.into());
        }
        pins.set_direction(config.led, Direction::Output);
        pins.set_level(config.led, state.led_on());
        pins.export_pin(config.led);

        if let Err(err) = pins.request_pin(config.button, PIN_PURPOSE) {
            release_led(&mut pins, config.led);
            host.remove_group(group);
            return Err(err.into());
        }
        pins.set_direction(config.button, Direction::Input);
        pins.set_debounce_window(config.button, debounce::DEBOUNCE_WINDOW_MS);
        pins.export_pin(config.button);
        info!("button level at start: {}", pins.get_level(config.button));

        let irq = match pins.map_to_interrupt(config.button) {
            Ok(irq) => irq,
            Err(err) => {
                release_button(&mut pins, config.button);
                release_led(&mut pins, config.led);
                host.remove_group(group);
                return Err(err.into());
            }
        };
        info!("button mapped to interrupt {}", irq.0);

        if let Err(err) = pins.register_edge_callback(irq, config.edge) {
            release_button(&mut pins, config.button);
            release_led(&mut pins, config.led);
            host.remove_group(group);
            return Err(err.into());
        }

        Ok(Self {
            pins,
            clock,
            host,
            group,
            group_name,
            irq,
            state,
        })
    }

    /// Handles one qualifying edge on the button pin.
    ///
    /// Invoked by the platform glue from its interrupt dispatch context.
    /// Never blocks and never fails: the LED toggle, pin write, timestamp
    /// capture and count increment are all bounded, and the only lock taken
    /// is the short critical section around the timestamp/interval pair.
    ///
    /// The interval is computed from the previous event time before the new
    /// timestamp replaces it, so the operation order here is load-bearing.
    pub fn handle_edge(&mut self) -> EdgeAck {
        let config = self.state.pin_config();
        let led = self.state.toggle_led();
        self.pins.set_level(config.led, led);

        let now = self.clock.now();
        self.state.record_event(now);
        let count = self.state.increment_press_count();

        debug!(
            "edge handled: press {}, button level {}",
            count,
            self.pins.get_level(config.button)
        );
        EdgeAck::Handled
    }

    /// Reads the named attribute as newline-terminated text.
    ///
    /// Safe to call concurrently with the event handler: scalar fields are
    /// read atomically and the timestamp/interval pair is snapshotted under
    /// the critical section, so no torn values are observable.
    pub fn read_attribute(&self, name: &str) -> Result<AttrValue, AttributeError> {
        let attr = Attribute::from_name(name).ok_or(AttributeError::Unknown)?;
        Ok(attrs::render(attr, &self.state))
    }

    /// Writes the named attribute from plain text.
    ///
    /// `pressCount` takes the payload's leading decimal integer wrapped
    /// into `u32`; `debounceEnabled` treats any non-zero integer as true
    /// and reprograms the filter. Malformed payloads leave state unchanged
    /// and return [`AttributeError::Malformed`]; whether that is surfaced
    /// to the external writer is the host glue's choice.
    pub fn write_attribute(&mut self, name: &str, payload: &str) -> Result<(), AttributeError> {
        let attr = Attribute::from_name(name).ok_or(AttributeError::Unknown)?;
        match attr {
            Attribute::PressCount => {
                let value = parse_payload(payload)?;
                // Wrapped into the unsigned width two's-complement style.
                self.state.set_press_count(value as u32);
                Ok(())
            }
            Attribute::DebounceEnabled => {
                let value = parse_payload(payload)?;
                self.set_debounce(value != 0);
                Ok(())
            }
            _ => Err(AttributeError::ReadOnly),
        }
    }

    /// Enables or disables the debounce filter on the button pin.
    pub fn set_debounce(&mut self, enabled: bool) {
        debounce::apply(&mut self.pins, self.state.pin_config().button, enabled);
        self.state.set_debounce_enabled(enabled);
    }

    /// The shared state record, for hosts that poll it directly.
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Name of the attribute group, e.g. `gpio27`.
    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    /// Interrupt handle the edge callback is registered against.
    pub fn irq(&self) -> IrqHandle {
        self.irq
    }

    /// Releases everything in reverse acquisition order.
    ///
    /// Always runs to completion: attribute group removal, LED driven low
    /// and unexported, edge callback deregistered, button unexported, both
    /// pins released.
    pub fn shutdown(self) {
        let ButtonController {
            mut pins,
            mut host,
            group,
            irq,
            state,
            ..
        } = self;
        let config = state.pin_config();

        host.remove_group(group);
        pins.set_level(config.led, false);
        pins.unexport_pin(config.led);
        pins.deregister_callback(irq);
        pins.unexport_pin(config.button);
        pins.release_pin(config.led);
        pins.release_pin(config.button);

        info!("button controller stopped after {} presses", state.press_count());
    }
}

fn parse_payload(payload: &str) -> Result<i64, AttributeError> {
    match attrs::parse_decimal(payload) {
        Some(value) => Ok(value),
        None => {
            warn!("ignoring malformed attribute payload");
            Err(AttributeError::Malformed)
        }
    }
}

/// Startup rollback: restores the LED to a safe level and releases it.
fn release_led<P: PinBackend>(pins: &mut P, led: PinId) {
    pins.set_level(led, false);
    pins.unexport_pin(led);
    pins.release_pin(led);
}

/// Startup rollback: releases the button pin.
fn release_button<P: PinBackend>(pins: &mut P, button: PinId) {
    pins.unexport_pin(button);
    pins.release_pin(button);
}
