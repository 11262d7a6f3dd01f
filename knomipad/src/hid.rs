//! Traits and types for HID keyboard reporting over BLE.
use core::future::Future;

use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;
use knomipad_types::modifier::HidModifiers;

use crate::config::TimingConfig;
use crate::state::BleHidState;

/// Size of a boot keyboard input report
pub const KEYBOARD_REPORT_SIZE: usize = 8;

/// Boot protocol keyboard input report: `[modifiers, reserved, keycodes[6]]`.
///
/// The macro pad never presses more than one key at a time, so only the
/// first keycode slot is ever used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    pub modifier: u8,
    pub reserved: u8,
    pub keycodes: [u8; 6],
}

impl KeyboardReport {
    pub fn new(modifiers: HidModifiers, keycode: u8) -> Self {
        Self {
            modifier: modifiers.into_bits(),
            reserved: 0,
            keycodes: [keycode, 0, 0, 0, 0, 0],
        }
    }

    /// All keys and modifiers released
    pub const fn release() -> Self {
        Self {
            modifier: 0,
            reserved: 0,
            keycodes: [0; 6],
        }
    }

    pub fn is_release(&self) -> bool {
        *self == Self::release()
    }

    pub fn modifiers(&self) -> HidModifiers {
        HidModifiers::from_bits(self.modifier)
    }

    /// First pressed keycode, 0 if none
    pub fn keycode(&self) -> u8 {
        self.keycodes[0]
    }

    pub fn to_bytes(&self) -> [u8; KEYBOARD_REPORT_SIZE] {
        let k = self.keycodes;
        [self.modifier, self.reserved, k[0], k[1], k[2], k[3], k[4], k[5]]
    }

    /// Serialize into `buf`, returns the number of bytes written
    pub fn serialize(&self, buf: &mut [u8]) -> Result<usize, HidError> {
        let out = buf.get_mut(..KEYBOARD_REPORT_SIZE).ok_or(HidError::BufferTooSmall)?;
        out.copy_from_slice(&self.to_bytes());
        Ok(KEYBOARD_REPORT_SIZE)
    }

    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        let data: &[u8; KEYBOARD_REPORT_SIZE] = data.get(..KEYBOARD_REPORT_SIZE)?.try_into().ok()?;
        Some(Self {
            modifier: data[0],
            reserved: data[1],
            keycodes: [data[2], data[3], data[4], data[5], data[6], data[7]],
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidError {
    /// Host isn't connected or hasn't subscribed to the input report
    NotReady,
    /// The BLE stack refused the notification
    BleError,
    BufferTooSmall,
}

impl core::fmt::Display for HidError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HidError::NotReady => f.write_str("host not connected or not subscribed"),
            HidError::BleError => f.write_str("BLE notification failed"),
            HidError::BufferTooSmall => f.write_str("report buffer too small"),
        }
    }
}

/// Writes reports to the host, usually by notifying the HID input characteristic.
pub trait HidWriterTrait {
    /// Report type
    type ReportType;

    /// Write report to the host, return the number of bytes written if success.
    fn write_report(&mut self, report: &Self::ReportType) -> impl Future<Output = Result<usize, HidError>>;
}

/// Control over the BLE connection itself
pub trait ConnectionControl {
    /// Ask the stack to drop the current connection
    fn disconnect(&mut self);
}

/// What the macro engine needs from the Bluetooth layer.
pub trait HidTransport {
    /// `true` when the host is connected and subscribed to input reports
    fn is_ready(&self) -> bool;

    /// NumLock state from the last LED output report of the host
    fn numlock_on(&self) -> bool;

    /// Send one report followed by the regular pacing delay.
    ///
    /// Dropped reports are never queued or retried.
    fn send_report(&mut self, modifiers: HidModifiers, keycode: u8) -> impl Future<Output = Result<(), HidError>>;

    /// Same as [`HidTransport::send_report`], with the short pacing used for alt-code bursts.
    fn send_raw(&mut self, modifiers: HidModifiers, keycode: u8) -> impl Future<Output = Result<(), HidError>>;

    /// Pacing applied after every [`HidTransport::send_report`]
    fn report_pacing(&self) -> Duration;

    fn disconnect(&mut self);

    /// Hold `modifiers` with no key pressed
    fn set_modifiers(&mut self, modifiers: HidModifiers) -> impl Future<Output = Result<(), HidError>> {
        self.send_report(modifiers, 0)
    }

    /// Release every key and modifier
    fn release_all(&mut self) -> impl Future<Output = Result<(), HidError>> {
        self.send_report(HidModifiers::new(), 0)
    }
}

/// [`HidTransport`] over a BLE HID input characteristic.
///
/// Reports are gated by the link state kept in [`BleHidState`] and every sent
/// report is followed by a pacing delay, otherwise hosts coalesce or drop keys.
pub struct BleTransport<'a, W, D> {
    writer: W,
    state: &'a BleHidState,
    delay: D,
    report_pacing: Duration,
    raw_report_pacing: Duration,
}

impl<'a, W, D> BleTransport<'a, W, D>
where
    W: HidWriterTrait<ReportType = KeyboardReport> + ConnectionControl,
    D: DelayNs,
{
    pub fn new(writer: W, state: &'a BleHidState, delay: D, timing: &TimingConfig) -> Self {
        Self {
            writer,
            state,
            delay,
            report_pacing: timing.report_pacing,
            raw_report_pacing: timing.raw_report_pacing,
        }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn state(&self) -> &'a BleHidState {
        self.state
    }

    async fn send_paced(&mut self, modifiers: HidModifiers, keycode: u8, pacing: Duration) -> Result<(), HidError> {
        if !self.state.ready() {
            warn!("Skip report, BLE host not ready: mods={:#x} key={:#x}", modifiers.into_bits(), keycode);
            return Err(HidError::NotReady);
        }
        let report = KeyboardReport::new(modifiers, keycode);
        match self.writer.write_report(&report).await {
            Ok(_) => {
                let us = u32::try_from(pacing.as_micros()).unwrap_or(u32::MAX);
                self.delay.delay_us(us).await;
                Ok(())
            }
            Err(e) => {
                error!("Failed to notify keyboard report: {:?}", e);
                Err(e)
            }
        }
    }
}

impl<W, D> HidTransport for BleTransport<'_, W, D>
where
    W: HidWriterTrait<ReportType = KeyboardReport> + ConnectionControl,
    D: DelayNs,
{
    fn is_ready(&self) -> bool {
        self.state.ready()
    }

    fn numlock_on(&self) -> bool {
        self.state.numlock_on()
    }

    async fn send_report(&mut self, modifiers: HidModifiers, keycode: u8) -> Result<(), HidError> {
        let pacing = self.report_pacing;
        self.send_paced(modifiers, keycode, pacing).await
    }

    async fn send_raw(&mut self, modifiers: HidModifiers, keycode: u8) -> Result<(), HidError> {
        let pacing = self.raw_report_pacing;
        self.send_paced(modifiers, keycode, pacing).await
    }

    fn report_pacing(&self) -> Duration {
        self.report_pacing
    }

    fn disconnect(&mut self) {
        info!("Disconnecting BLE host");
        self.writer.disconnect();
    }
}
