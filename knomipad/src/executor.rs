//! Plays compiled macros back as paced keyboard reports.
use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;
use knomipad_types::keycode::HidKeyCode;
use knomipad_types::macro_kind::MacroKind;
use knomipad_types::modifier::HidModifiers;

use crate::config::MacroConfig;
use crate::hid::HidTransport;
use crate::mapper::{ParsedCombo, char_to_key};
use crate::parser::{HoldBody, HoldToken, KeyStep, MacroPlan, ParseError};
use crate::slot::MacroSlot;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MacroError {
    /// Payload rejected, nothing was sent
    Parse(ParseError),
    /// Host not connected or not subscribed, nothing was sent
    NotReady,
}

impl From<ParseError> for MacroError {
    fn from(e: ParseError) -> Self {
        MacroError::Parse(e)
    }
}

impl core::fmt::Display for MacroError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MacroError::Parse(e) => write!(f, "invalid macro: {}", e),
            MacroError::NotReady => f.write_str("BLE host not ready"),
        }
    }
}

/// Phases of a hold sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum HoldState {
    Idle,
    ModifiersDown,
    Emitting,
    ModifiersUp,
}

/// Runs one macro at a time on a [`HidTransport`].
///
/// Runs are never interleaved: every entry point takes `&mut self` and only
/// returns once the last report of the macro has been sent.
pub struct MacroExecutor<T: HidTransport, D: DelayNs> {
    transport: T,
    delay: D,
    config: MacroConfig,
}

impl<T: HidTransport, D: DelayNs> MacroExecutor<T, D> {
    pub fn new(transport: T, delay: D, config: MacroConfig) -> Self {
        Self {
            transport,
            delay,
            config,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn config(&self) -> &MacroConfig {
        &self.config
    }

    /// Parse `payload` as `kind` and play it.
    ///
    /// Readiness is checked before parsing, and the payload is fully parsed
    /// before the first report is sent.
    pub async fn run(&mut self, kind: MacroKind, payload: &str) -> Result<(), MacroError> {
        self.check_ready(kind)?;
        let plan = MacroPlan::parse(kind, payload).inspect_err(|e| error!("Invalid {} macro: {:?}", kind.as_str(), e))?;
        self.play(&plan).await;
        Ok(())
    }

    /// Run a stored slot right away, without going through the dispatch queue
    pub async fn run_slot(&mut self, slot: &MacroSlot) -> Result<(), MacroError> {
        debug!("Running macro slot {}", slot.id);
        self.run(slot.kind, slot.payload.as_str()).await
    }

    pub async fn run_keystroke(&mut self, payload: &str) -> Result<(), MacroError> {
        self.run(MacroKind::Keystroke, payload).await
    }

    pub async fn run_typing(&mut self, payload: &str) -> Result<(), MacroError> {
        self.run(MacroKind::Typing, payload).await
    }

    pub async fn run_keybind(&mut self, payload: &str) -> Result<(), MacroError> {
        self.run(MacroKind::Keybind, payload).await
    }

    pub async fn run_holdseq(&mut self, payload: &str) -> Result<(), MacroError> {
        self.run(MacroKind::HoldSeq, payload).await
    }

    /// Play an already compiled plan
    pub async fn execute(&mut self, plan: &MacroPlan) -> Result<(), MacroError> {
        self.check_ready(plan.kind())?;
        self.play(plan).await;
        Ok(())
    }

    fn check_ready(&self, kind: MacroKind) -> Result<(), MacroError> {
        if self.transport.is_ready() {
            Ok(())
        } else {
            info!("BLE host not ready, {} macro ignored", kind.as_str());
            Err(MacroError::NotReady)
        }
    }

    async fn play(&mut self, plan: &MacroPlan) {
        match plan {
            MacroPlan::Keystroke(steps) => self.play_keystroke(steps).await,
            MacroPlan::Typing { text, cps } => self.play_typing(text, *cps).await,
            MacroPlan::Keybind(combo) => self.play_keybind(*combo).await,
            MacroPlan::HoldSeq { modifiers, body } => self.play_holdseq(*modifiers, body).await,
        }
    }

    async fn play_keystroke(&mut self, steps: &[KeyStep]) {
        let timing = self.config.timing;
        for step in steps {
            if !step.is_delay() {
                self.tap(
                    HidModifiers::from_bits(step.modifiers),
                    step.keycode,
                    timing.key_hold,
                    timing.key_settle,
                )
                .await;
            }
            if step.wait_ms > 0 {
                self.delay.delay_ms(step.wait_ms).await;
            }
        }
    }

    async fn play_typing(&mut self, text: &str, cps: u8) {
        let timing = self.config.timing;
        let interval = Duration::from_micros(1_000_000 / u64::from(cps.max(1)));
        // Both reports are paced by the transport, the rest of the interval is waited here
        let busy = timing.typing_hold.as_micros() + 2 * self.transport.report_pacing().as_micros();
        let rest = Duration::from_micros(interval.as_micros().saturating_sub(busy));

        for c in text.chars() {
            let Some((key, modifiers)) = char_to_key(c) else {
                trace!("Skip unmapped character {}", c);
                continue;
            };
            self.send(modifiers, key as u8).await;
            self.wait(timing.typing_hold).await;
            self.send(HidModifiers::new(), 0).await;
            self.wait(rest).await;
        }
    }

    async fn play_keybind(&mut self, combo: ParsedCombo) {
        let timing = self.config.timing;
        self.tap(combo.modifiers, combo.keycode, timing.key_hold, timing.key_settle)
            .await;
    }

    async fn play_holdseq(&mut self, modifiers: HidModifiers, body: &HoldBody) {
        let timing = self.config.timing;
        let mut state = HoldState::Idle;

        // Alt codes only work with the keypad in numeric mode
        let restore_numlock = modifiers.has_alt() && !self.transport.numlock_on();
        if restore_numlock {
            debug!("Turning NumLock on for alt code entry");
            self.tap_numlock().await;
            self.wait(timing.numlock_settle).await;
        }

        state = self.transition(state, HoldState::ModifiersDown);
        match body {
            HoldBody::AltCode(digits) => {
                // Modifiers stay down for the whole number, an all-zero report
                // in between would end the alt code early
                self.send_raw(modifiers, 0).await;
                state = self.transition(state, HoldState::Emitting);
                for keycode in digits.iter().filter_map(|&d| keypad_digit(d)) {
                    self.send_raw(modifiers, keycode).await;
                    self.send_raw(modifiers, 0).await;
                }
                state = self.transition(state, HoldState::ModifiersUp);
                self.send_raw(HidModifiers::new(), 0).await;
            }
            HoldBody::Tokens(tokens) => {
                self.send(modifiers, 0).await;
                self.wait(timing.holdseq_modifier_settle).await;
                state = self.transition(state, HoldState::Emitting);
                for token in tokens {
                    match token {
                        HoldToken::Wait(ms) => self.delay.delay_ms(*ms).await,
                        HoldToken::Digits(digits) => {
                            for keycode in digits.iter().filter_map(|&d| keypad_digit(d)) {
                                self.tap(modifiers, keycode, timing.holdseq_tap_hold, timing.key_settle)
                                    .await;
                            }
                        }
                        HoldToken::Key { keycode, extra } => {
                            self.tap(modifiers | *extra, *keycode, timing.holdseq_tap_hold, timing.key_settle)
                                .await;
                        }
                    }
                }
                state = self.transition(state, HoldState::ModifiersUp);
                self.send(HidModifiers::new(), 0).await;
                self.wait(timing.holdseq_modifier_settle).await;
            }
        }
        self.transition(state, HoldState::Idle);

        if restore_numlock {
            debug!("Restoring NumLock");
            self.wait(timing.numlock_settle).await;
            self.tap_numlock().await;
        }
    }

    fn transition(&self, from: HoldState, to: HoldState) -> HoldState {
        trace!("Hold sequence: {:?} -> {:?}", from, to);
        to
    }

    async fn tap_numlock(&mut self) {
        let timing = self.config.timing;
        self.tap(HidModifiers::new(), HidKeyCode::NumLock as u8, timing.numlock_hold, timing.key_settle)
            .await;
    }

    /// Press, hold, release everything, settle
    async fn tap(&mut self, modifiers: HidModifiers, keycode: u8, hold: Duration, settle: Duration) {
        self.send(modifiers, keycode).await;
        self.wait(hold).await;
        self.send(HidModifiers::new(), 0).await;
        self.wait(settle).await;
    }

    // A failed report is already logged by the transport, the run goes on with the next one
    async fn send(&mut self, modifiers: HidModifiers, keycode: u8) {
        let _ = self.transport.send_report(modifiers, keycode).await;
    }

    async fn send_raw(&mut self, modifiers: HidModifiers, keycode: u8) {
        let _ = self.transport.send_raw(modifiers, keycode).await;
    }

    async fn wait(&mut self, duration: Duration) {
        let us = u32::try_from(duration.as_micros()).unwrap_or(u32::MAX);
        if us > 0 {
            self.delay.delay_us(us).await;
        }
    }
}

fn keypad_digit(digit: u8) -> Option<u8> {
    HidKeyCode::from_keypad_digit(char::from(digit)).map(|k| k as u8)
}
