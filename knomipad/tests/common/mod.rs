#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal_async::delay::DelayNs;
use knomipad::config::{MacroConfig, TimingConfig};
use knomipad::executor::MacroExecutor;
use knomipad::hid::{BleTransport, ConnectionControl, HidError, HidWriterTrait, KeyboardReport};
use knomipad::state::BleHidState;

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

pub const KC_LCTRL: u8 = 1 << 0;
pub const KC_LSHIFT: u8 = 1 << 1;
pub const KC_LALT: u8 = 1 << 2;
pub const KC_LGUI: u8 = 1 << 3;

pub const KC_A: u8 = 0x04;
pub const KC_B: u8 = 0x05;
pub const KC_C: u8 = 0x06;
pub const KC_E: u8 = 0x08;
pub const KC_H: u8 = 0x0B;
pub const KC_L: u8 = 0x0F;
pub const KC_O: u8 = 0x12;
pub const KC_V: u8 = 0x19;
pub const KC_TAB: u8 = 0x2B;
pub const KC_ENTER: u8 = 0x28;
pub const KC_F12: u8 = 0x45;
pub const KC_NUMLOCK: u8 = 0x53;
pub const KC_KP_1: u8 = 0x59;
pub const KC_KP_2: u8 = 0x5A;
pub const KC_KP_7: u8 = 0x5F;
pub const KC_KP_9: u8 = 0x61;
pub const KC_KP_0: u8 = 0x62;

/// `(modifiers, keycode)` of an all-zero report
pub const RELEASE: (u8, u8) = (0, 0);

/// Virtual time, advanced only by [`MockDelay`]
#[derive(Clone, Default)]
pub struct MockClock {
    now_ns: Rc<Cell<u64>>,
}

impl MockClock {
    pub fn now_us(&self) -> u64 {
        self.now_ns.get() / 1000
    }

    fn advance_ns(&self, ns: u64) {
        self.now_ns.set(self.now_ns.get() + ns);
    }
}

/// Delay that returns immediately and moves the [`MockClock`] forward
#[derive(Clone)]
pub struct MockDelay {
    clock: MockClock,
}

impl MockDelay {
    pub fn new(clock: MockClock) -> Self {
        Self { clock }
    }
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.clock.advance_ns(ns as u64);
    }

    async fn delay_us(&mut self, us: u32) {
        self.clock.advance_ns(us as u64 * 1_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.clock.advance_ns(ms as u64 * 1_000_000);
    }
}

/// Every report the writer accepted, stamped with the virtual time it was sent at
#[derive(Clone, Default)]
pub struct ReportLog {
    reports: Rc<RefCell<Vec<(u64, KeyboardReport)>>>,
    attempts: Rc<Cell<usize>>,
}

impl ReportLog {
    pub fn len(&self) -> usize {
        self.reports.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes tried, including failed ones
    pub fn attempts(&self) -> usize {
        self.attempts.get()
    }

    pub fn reports(&self) -> Vec<KeyboardReport> {
        self.reports.borrow().iter().map(|(_, r)| *r).collect()
    }

    /// `(modifiers, keycode)` of every report
    pub fn keys(&self) -> Vec<(u8, u8)> {
        self.reports.borrow().iter().map(|(_, r)| (r.modifier, r.keycode())).collect()
    }

    /// Send time of every report, in µs
    pub fn times(&self) -> Vec<u64> {
        self.reports.borrow().iter().map(|(t, _)| *t).collect()
    }

    /// Send times of the reports that press `keycode`
    pub fn press_times(&self, keycode: u8) -> Vec<u64> {
        self.reports
            .borrow()
            .iter()
            .filter(|(_, r)| r.keycode() == keycode)
            .map(|(t, _)| *t)
            .collect()
    }
}

/// Stands in for the HID input characteristic of the BLE stack
pub struct RecordingWriter {
    clock: MockClock,
    log: ReportLog,
    /// Reject every write, like a notification failing mid-run
    pub fail: Rc<Cell<bool>>,
    pub disconnects: Rc<Cell<u32>>,
}

impl HidWriterTrait for RecordingWriter {
    type ReportType = KeyboardReport;

    async fn write_report(&mut self, report: &KeyboardReport) -> Result<usize, HidError> {
        self.log.attempts.set(self.log.attempts.get() + 1);
        if self.fail.get() {
            return Err(HidError::BleError);
        }
        let mut buf = [0u8; 8];
        let n = report.serialize(&mut buf)?;
        assert_eq!(KeyboardReport::from_bytes(&buf), Some(*report));
        self.log.reports.borrow_mut().push((self.clock.now_us(), *report));
        Ok(n)
    }
}

impl ConnectionControl for RecordingWriter {
    fn disconnect(&mut self) {
        self.disconnects.set(self.disconnects.get() + 1);
    }
}

pub type TestTransport = BleTransport<'static, RecordingWriter, MockDelay>;
pub type TestExecutor = MacroExecutor<TestTransport, MockDelay>;

pub struct TestRig {
    pub state: &'static BleHidState,
    pub clock: MockClock,
    pub log: ReportLog,
    pub fail: Rc<Cell<bool>>,
    pub disconnects: Rc<Cell<u32>>,
}

impl TestRig {
    /// Host connected and subscribed, NumLock off
    pub fn ready() -> Self {
        let rig = Self::not_ready();
        rig.state.on_connect();
        rig.state.on_subscribe();
        rig
    }

    pub fn not_ready() -> Self {
        Self {
            state: Box::leak(Box::new(BleHidState::new())),
            clock: MockClock::default(),
            log: ReportLog::default(),
            fail: Rc::new(Cell::new(false)),
            disconnects: Rc::new(Cell::new(0)),
        }
    }

    pub fn transport(&self) -> TestTransport {
        self.transport_with(&TimingConfig::default())
    }

    pub fn transport_with(&self, timing: &TimingConfig) -> TestTransport {
        let writer = RecordingWriter {
            clock: self.clock.clone(),
            log: self.log.clone(),
            fail: self.fail.clone(),
            disconnects: self.disconnects.clone(),
        };
        BleTransport::new(writer, self.state, MockDelay::new(self.clock.clone()), timing)
    }

    pub fn executor(&self) -> TestExecutor {
        MacroExecutor::new(self.transport(), MockDelay::new(self.clock.clone()), MacroConfig::default())
    }

    pub fn set_numlock(&self, on: bool) {
        self.state.on_output_report(&[on as u8]);
    }
}
