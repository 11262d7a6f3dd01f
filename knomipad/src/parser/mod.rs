//! Macro grammars.
//!
//! Every payload is compiled into a [`MacroPlan`] before anything is sent, so
//! a malformed macro never produces HID traffic.
mod error;
mod holdseq;
mod keybind;
mod keystroke;
mod typing;

pub use error::ParseError;
pub use holdseq::parse_holdseq;
pub use keybind::parse_keybind;
pub use keystroke::parse_keystroke;
pub use typing::parse_typing;

use heapless::{String, Vec};
use knomipad_types::macro_kind::MacroKind;
use knomipad_types::modifier::HidModifiers;
use serde::{Deserialize, Serialize};

use crate::mapper::{ParsedCombo, map_token};
use crate::{ALT_CODE_MAX_DIGITS, HOLDSEQ_MAX_TOKENS, MACRO_MAX_STEPS, MACRO_PAYLOAD_SIZE};

/// One step of a keystroke macro: tap the combo, then wait.
///
/// `keycode == 0` is a pure delay step, produced only by a leading wait.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyStep {
    pub keycode: u8,
    pub modifiers: u8,
    pub wait_ms: u32,
}

impl KeyStep {
    pub fn tap(combo: ParsedCombo) -> Self {
        Self {
            keycode: combo.keycode,
            modifiers: combo.modifiers.into_bits(),
            wait_ms: 0,
        }
    }

    pub fn delay(wait_ms: u32) -> Self {
        Self {
            keycode: 0,
            modifiers: 0,
            wait_ms,
        }
    }

    pub fn is_delay(&self) -> bool {
        self.keycode == 0
    }
}

/// One token on the right hand side of a hold sequence
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HoldToken {
    Wait(u32),
    /// Keypad digits, only produced while Alt is held
    Digits(Vec<u8, ALT_CODE_MAX_DIGITS>),
    /// Tap `key` with `extra` modifiers on top of the held ones
    Key { keycode: u8, extra: HidModifiers },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HoldBody {
    /// Whole right hand side is one number typed with Alt held, as ASCII digits
    AltCode(Vec<u8, ALT_CODE_MAX_DIGITS>),
    Tokens(Vec<HoldToken, HOLDSEQ_MAX_TOKENS>),
}

/// A compiled macro, ready to be played back.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MacroPlan {
    Keystroke(Vec<KeyStep, MACRO_MAX_STEPS>),
    Typing {
        text: String<MACRO_PAYLOAD_SIZE>,
        cps: u8,
    },
    Keybind(ParsedCombo),
    HoldSeq {
        modifiers: HidModifiers,
        body: HoldBody,
    },
}

impl MacroPlan {
    pub fn parse(kind: MacroKind, payload: &str) -> Result<Self, ParseError> {
        if payload.len() > MACRO_PAYLOAD_SIZE {
            return Err(ParseError::PayloadTooLong);
        }
        match kind {
            MacroKind::Keystroke => keystroke::parse_keystroke(payload).map(MacroPlan::Keystroke),
            MacroKind::Typing => typing::parse_typing(payload).map(|(text, cps)| MacroPlan::Typing { text, cps }),
            MacroKind::Keybind => keybind::parse_keybind(payload).map(MacroPlan::Keybind),
            MacroKind::HoldSeq => {
                holdseq::parse_holdseq(payload).map(|(modifiers, body)| MacroPlan::HoldSeq { modifiers, body })
            }
        }
    }

    pub fn kind(&self) -> MacroKind {
        match self {
            MacroPlan::Keystroke(_) => MacroKind::Keystroke,
            MacroPlan::Typing { .. } => MacroKind::Typing,
            MacroPlan::Keybind(_) => MacroKind::Keybind,
            MacroPlan::HoldSeq { .. } => MacroKind::HoldSeq,
        }
    }
}

/// Check a payload without keeping the plan, e.g. before saving a slot
pub fn is_valid(kind: MacroKind, payload: &str) -> bool {
    MacroPlan::parse(kind, payload).is_ok()
}

/// Parse a wait token: `<digits>ms` or `<digits>s`, unit in any case.
///
/// Whitespace is allowed between the number and the unit. Returns `Ok(None)`
/// if the token isn't a wait at all, so callers can try it as a key.
pub(crate) fn parse_wait(token: &str) -> Result<Option<u32>, ParseError> {
    let token = token.trim();
    let bytes = token.as_bytes();
    // `s`, `S` and `ms` alone are key names, not waits
    if !bytes.first().is_some_and(u8::is_ascii_digit) {
        return Ok(None);
    }
    let (number, scale) = if bytes.len() >= 2 && bytes[bytes.len() - 2..].eq_ignore_ascii_case(b"ms") {
        (&token[..token.len() - 2], 1)
    } else if bytes.last().is_some_and(|b| b.eq_ignore_ascii_case(&b's')) {
        (&token[..token.len() - 1], 1000)
    } else {
        return Ok(None);
    };

    let number = number.trim_end();
    if !number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidWait);
    }
    let value = number
        .bytes()
        .fold(0u32, |acc, b| acc.saturating_mul(10).saturating_add(u32::from(b - b'0')));
    Ok(Some(value.saturating_mul(scale)))
}

/// Parse a `+` joined combo, at most one non-modifier key and order free.
pub(crate) fn parse_combo(token: &str) -> Result<ParsedCombo, ParseError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ParseError::EmptyToken);
    }
    let mut combo = ParsedCombo::default();
    for part in token.split('+') {
        if part.trim().is_empty() {
            return Err(ParseError::EmptyToken);
        }
        let mapped = map_token(part).ok_or(ParseError::UnknownKey)?;
        if mapped.has_key() {
            if combo.has_key() {
                return Err(ParseError::MultipleKeys);
            }
            combo.keycode = mapped.keycode;
        }
        combo.modifiers |= mapped.modifiers;
    }
    if !combo.has_key() {
        return Err(ParseError::NoKey);
    }
    Ok(combo)
}
