//! Link state reported by the BLE stack.
//!
//! Every field has exactly one writer, the context that receives the radio
//! events (GAP/GATT callbacks). The macro worker only takes snapshots, so
//! plain atomics are enough and no lock is ever held across a report.
use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use knomipad_types::led_indicator::LedIndicator;

/// Point-in-time copy of the connection state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectionState {
    pub connected: bool,
    /// Number of CCCD subscriptions to the keyboard input report
    pub subscribed_count: u8,
}

impl ConnectionState {
    /// Input reports can only be notified to a connected host that subscribed to them
    pub fn ready(&self) -> bool {
        self.connected && self.subscribed_count > 0
    }
}

pub struct BleHidState {
    connected: AtomicBool,
    subscribed_count: AtomicU8,
    leds: AtomicU8,
}

impl Default for BleHidState {
    fn default() -> Self {
        Self::new()
    }
}

impl BleHidState {
    pub const fn new() -> Self {
        Self {
            connected: AtomicBool::new(false),
            subscribed_count: AtomicU8::new(0),
            leds: AtomicU8::new(0),
        }
    }

    pub fn on_connect(&self) {
        info!("BLE host connected");
        self.connected.store(true, Ordering::Release);
    }

    /// Subscriptions don't survive a disconnect, the host writes the CCCD again on reconnect.
    pub fn on_disconnect(&self) {
        info!("BLE host disconnected");
        self.connected.store(false, Ordering::Release);
        self.subscribed_count.store(0, Ordering::Release);
    }

    pub fn on_subscribe(&self) {
        let count = self.subscribed_count.load(Ordering::Acquire).saturating_add(1);
        debug!("Input report subscribed, subscriptions: {}", count);
        self.subscribed_count.store(count, Ordering::Release);
    }

    pub fn on_unsubscribe(&self) {
        let count = self.subscribed_count.load(Ordering::Acquire).saturating_sub(1);
        debug!("Input report unsubscribed, subscriptions: {}", count);
        self.subscribed_count.store(count, Ordering::Release);
    }

    /// For stacks that report the subscriber count directly
    pub fn set_subscribed_count(&self, count: u8) {
        self.subscribed_count.store(count, Ordering::Release);
    }

    /// Host wrote the keyboard output report. Only the first byte carries LED bits.
    pub fn on_output_report(&self, data: &[u8]) {
        if let Some(&leds) = data.first() {
            debug!("Host LED state: {:#x}", leds);
            self.leds.store(leds, Ordering::Release);
        }
    }

    pub fn snapshot(&self) -> ConnectionState {
        ConnectionState {
            connected: self.connected.load(Ordering::Acquire),
            subscribed_count: self.subscribed_count.load(Ordering::Acquire),
        }
    }

    pub fn ready(&self) -> bool {
        self.snapshot().ready()
    }

    pub fn leds(&self) -> LedIndicator {
        LedIndicator::from_bits(self.leds.load(Ordering::Acquire))
    }

    pub fn numlock_on(&self) -> bool {
        self.leds().num_lock()
    }
}
