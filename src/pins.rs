//! Hardware pin abstraction.
//!
//! Defines [`PinBackend`], the single hardware collaborator the controller
//! depends on. Implement it for your platform's GPIO layer (memory-mapped
//! registers, a character-device interface, a simulator, ...) to let the
//! controller acquire pins, drive the LED and arm the button interrupt.

/// Identifier of a digital I/O pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId(pub u32);

/// Opaque handle for an interrupt line a pin has been mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IrqHandle(pub u32);

/// Direction of a digital pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// High-impedance input.
    Input,
    /// Push-pull output.
    Output,
}

/// Which signal transition qualifies as a button event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgePolarity {
    /// Low-to-high transition.
    #[default]
    Rising,
    /// High-to-low transition.
    Falling,
}

/// Errors from fallible hardware acquisition operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// The pin could not be reserved (busy, invalid, or restricted).
    RequestFailed(PinId),
    /// The pin has no interrupt line available.
    InterruptUnavailable(PinId),
    /// The edge callback could not be registered on the interrupt line.
    RegistrationFailed(IrqHandle),
}

impl core::fmt::Display for PinError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PinError::RequestFailed(pin) => {
                write!(f, "failed to request pin {}", pin.0)
            }
            PinError::InterruptUnavailable(pin) => {
                write!(f, "no interrupt line available for pin {}", pin.0)
            }
            PinError::RegistrationFailed(irq) => {
                write!(f, "failed to register edge callback on interrupt {}", irq.0)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PinError {}

/// Platform GPIO capabilities the controller is built on.
///
/// Acquisition operations (`request_pin`, `map_to_interrupt`,
/// `register_edge_callback`) are fallible and abort startup. The level and
/// housekeeping operations are infallible by contract: implementations must
/// handle hardware errors internally rather than report them, since the
/// event handler calls [`PinBackend::set_level`] from an interrupt-like
/// context with no recovery path.
///
/// Edge delivery is the platform glue's responsibility: after
/// `register_edge_callback` succeeds, whatever execution context the
/// platform dispatches interrupts from must invoke
/// [`ButtonController::handle_edge`](crate::controller::ButtonController::handle_edge)
/// once per qualifying edge.
pub trait PinBackend {
    /// Reserves a pin for exclusive use, tagged with a purpose label.
    fn request_pin(&mut self, pin: PinId, purpose: &'static str) -> Result<(), PinError>;

    /// Configures a pin as input or output.
    fn set_direction(&mut self, pin: PinId, direction: Direction);

    /// Drives an output pin's logic level.
    fn set_level(&mut self, pin: PinId, high: bool);

    /// Reads a pin's current logic level.
    fn get_level(&self, pin: PinId) -> bool;

    /// Makes the pin visible to the host environment.
    fn export_pin(&mut self, pin: PinId);

    /// Removes the pin from host visibility.
    fn unexport_pin(&mut self, pin: PinId);

    /// Returns a reserved pin to the platform.
    fn release_pin(&mut self, pin: PinId);

    /// Programs the debounce filter window on an input pin, in
    /// milliseconds. A window of 0 removes the filter.
    fn set_debounce_window(&mut self, pin: PinId, window_ms: u32);

    /// Maps an input pin to an interrupt line.
    fn map_to_interrupt(&mut self, pin: PinId) -> Result<IrqHandle, PinError>;

    /// Arms edge detection on an interrupt line with the given polarity.
    fn register_edge_callback(
        &mut self,
        irq: IrqHandle,
        polarity: EdgePolarity,
    ) -> Result<(), PinError>;

    /// Disarms edge detection on an interrupt line.
    fn deregister_callback(&mut self, irq: IrqHandle);
}
