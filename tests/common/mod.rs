//! Shared test infrastructure for button-controller integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use button_controller::{
    Access, AttributeHost, AttributeHostError, Clock, Direction, EdgePolarity, IrqHandle,
    PinBackend, PinError, PinId, Timestamp,
};

// ============================================================================
// Mock Clock
// ============================================================================

/// Mock monotonic clock with controllable time advancement
pub struct MockClock {
    current_time: Cell<Timestamp>,
}

impl MockClock {
    pub fn new() -> Self {
        Self {
            current_time: Cell::new(Timestamp::ZERO),
        }
    }

    pub fn starting_at(time: Timestamp) -> Self {
        Self {
            current_time: Cell::new(time),
        }
    }

    /// Advance time by whole seconds plus nanoseconds
    pub fn advance(&self, secs: u64, nanos: u32) {
        let now = self.current_time.get();
        self.current_time
            .set(Timestamp::new(now.secs() + secs, now.subsec_nanos() + nanos));
    }

    pub fn set_time(&self, time: Timestamp) {
        self.current_time.set(time);
    }
}

impl Clock for MockClock {
    fn now(&self) -> Timestamp {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Pin Backend
// ============================================================================

/// Every backend call, in invocation order, for sequence assertions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinOp {
    Request(u32),
    SetDirection(u32, Direction),
    SetLevel(u32, bool),
    Export(u32),
    Unexport(u32),
    Release(u32),
    SetDebounce(u32, u32),
    MapInterrupt(u32),
    RegisterCallback(u32),
    DeregisterCallback(u32),
}

/// Per-pin bookkeeping
#[derive(Debug, Clone, Default)]
pub struct PinRecord {
    pub requested: bool,
    pub released: bool,
    pub exported: bool,
    pub direction: Option<Direction>,
    pub level: bool,
    /// Every debounce window ever programmed, in order
    pub debounce_windows: Vec<u32>,
}

#[derive(Default)]
struct PinsInner {
    records: BTreeMap<u32, PinRecord>,
    ops: Vec<PinOp>,
    armed: Option<(IrqHandle, EdgePolarity)>,
    fail_request: Option<PinId>,
    fail_interrupt_mapping: bool,
    fail_callback_registration: bool,
}

/// Mock pin backend that records every operation.
///
/// Clones share the same underlying recording, so tests keep a handle while
/// the controller owns another.
#[derive(Clone, Default)]
pub struct MockPins {
    inner: Rc<RefCell<PinsInner>>,
}

impl MockPins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `request_pin` fail for the given pin
    pub fn fail_request(&self, pin: PinId) {
        self.inner.borrow_mut().fail_request = Some(pin);
    }

    /// Make `map_to_interrupt` fail
    pub fn fail_interrupt_mapping(&self) {
        self.inner.borrow_mut().fail_interrupt_mapping = true;
    }

    /// Make `register_edge_callback` fail
    pub fn fail_callback_registration(&self) {
        self.inner.borrow_mut().fail_callback_registration = true;
    }

    pub fn record(&self, pin: PinId) -> PinRecord {
        self.inner
            .borrow()
            .records
            .get(&pin.0)
            .cloned()
            .unwrap_or_default()
    }

    pub fn level(&self, pin: PinId) -> bool {
        self.record(pin).level
    }

    pub fn debounce_windows(&self, pin: PinId) -> Vec<u32> {
        self.record(pin).debounce_windows
    }

    pub fn ops(&self) -> Vec<PinOp> {
        self.inner.borrow().ops.clone()
    }

    pub fn armed(&self) -> Option<(IrqHandle, EdgePolarity)> {
        self.inner.borrow().armed
    }
}

impl PinBackend for MockPins {
    fn request_pin(&mut self, pin: PinId, _purpose: &'static str) -> Result<(), PinError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_request == Some(pin) {
            return Err(PinError::RequestFailed(pin));
        }
        inner.ops.push(PinOp::Request(pin.0));
        inner.records.entry(pin.0).or_default().requested = true;
        Ok(())
    }

    fn set_direction(&mut self, pin: PinId, direction: Direction) {
        let mut inner = self.inner.borrow_mut();
        inner.ops.push(PinOp::SetDirection(pin.0, direction));
        inner.records.entry(pin.0).or_default().direction = Some(direction);
    }

    fn set_level(&mut self, pin: PinId, high: bool) {
        let mut inner = self.inner.borrow_mut();
        inner.ops.push(PinOp::SetLevel(pin.0, high));
        inner.records.entry(pin.0).or_default().level = high;
    }

    fn get_level(&self, pin: PinId) -> bool {
        self.inner
            .borrow()
            .records
            .get(&pin.0)
            .map(|record| record.level)
            .unwrap_or(false)
    }

    fn export_pin(&mut self, pin: PinId) {
        let mut inner = self.inner.borrow_mut();
        inner.ops.push(PinOp::Export(pin.0));
        inner.records.entry(pin.0).or_default().exported = true;
    }

    fn unexport_pin(&mut self, pin: PinId) {
        let mut inner = self.inner.borrow_mut();
        inner.ops.push(PinOp::Unexport(pin.0));
        inner.records.entry(pin.0).or_default().exported = false;
    }

    fn release_pin(&mut self, pin: PinId) {
        let mut inner = self.inner.borrow_mut();
        inner.ops.push(PinOp::Release(pin.0));
        let record = inner.records.entry(pin.0).or_default();
        record.requested = false;
        record.released = true;
    }

    fn set_debounce_window(&mut self, pin: PinId, window_ms: u32) {
        let mut inner = self.inner.borrow_mut();
        inner.ops.push(PinOp::SetDebounce(pin.0, window_ms));
        inner
            .records
            .entry(pin.0)
            .or_default()
            .debounce_windows
            .push(window_ms);
    }

    fn map_to_interrupt(&mut self, pin: PinId) -> Result<IrqHandle, PinError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_interrupt_mapping {
            return Err(PinError::InterruptUnavailable(pin));
        }
        inner.ops.push(PinOp::MapInterrupt(pin.0));
        Ok(IrqHandle(200 + pin.0))
    }

    fn register_edge_callback(
        &mut self,
        irq: IrqHandle,
        polarity: EdgePolarity,
    ) -> Result<(), PinError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_callback_registration {
            return Err(PinError::RegistrationFailed(irq));
        }
        inner.ops.push(PinOp::RegisterCallback(irq.0));
        inner.armed = Some((irq, polarity));
        Ok(())
    }

    fn deregister_callback(&mut self, irq: IrqHandle) {
        let mut inner = self.inner.borrow_mut();
        inner.ops.push(PinOp::DeregisterCallback(irq.0));
        inner.armed = None;
    }
}

// ============================================================================
// Mock Attribute Host
// ============================================================================

#[derive(Default)]
struct HostInner {
    created: Vec<String>,
    registered: Vec<(String, &'static str, Access)>,
    removed: Vec<String>,
    fail_group_creation: bool,
    fail_attribute: Option<&'static str>,
}

/// Mock attribute-tree host that records registrations.
///
/// Clones share the same underlying recording.
#[derive(Clone, Default)]
pub struct MockHost {
    inner: Rc<RefCell<HostInner>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create_group` fail
    pub fn fail_group_creation(&self) {
        self.inner.borrow_mut().fail_group_creation = true;
    }

    /// Make registration of the named attribute fail
    pub fn fail_attribute(&self, name: &'static str) {
        self.inner.borrow_mut().fail_attribute = Some(name);
    }

    pub fn created_groups(&self) -> Vec<String> {
        self.inner.borrow().created.clone()
    }

    pub fn registered(&self) -> Vec<(String, &'static str, Access)> {
        self.inner.borrow().registered.clone()
    }

    pub fn removed_groups(&self) -> Vec<String> {
        self.inner.borrow().removed.clone()
    }

    /// True while a group exists that has not been removed
    pub fn group_active(&self, name: &str) -> bool {
        let inner = self.inner.borrow();
        inner.created.iter().any(|g| g == name) && !inner.removed.iter().any(|g| g == name)
    }
}

impl AttributeHost for MockHost {
    type Group = String;

    fn create_group(&mut self, name: &str) -> Result<String, AttributeHostError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_group_creation {
            return Err(AttributeHostError);
        }
        inner.created.push(name.to_string());
        Ok(name.to_string())
    }

    fn register_attribute(
        &mut self,
        group: &String,
        name: &'static str,
        access: Access,
    ) -> Result<(), AttributeHostError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_attribute == Some(name) {
            return Err(AttributeHostError);
        }
        inner.registered.push((group.clone(), name, access));
        Ok(())
    }

    fn remove_group(&mut self, group: String) {
        self.inner.borrow_mut().removed.push(group);
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Start a controller with the default wiring (button 27, LED 17, rising)
pub fn start_default<'c>(
    pins: &MockPins,
    clock: &'c MockClock,
    host: &MockHost,
) -> button_controller::ButtonController<'c, MockPins, MockClock, MockHost> {
    button_controller::ButtonController::start(
        pins.clone(),
        clock,
        host.clone(),
        button_controller::PinConfig::default(),
    )
    .expect("startup should succeed with healthy mocks")
}
