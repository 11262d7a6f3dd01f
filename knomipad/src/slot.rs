//! Macro slots as the configuration layer stores them.
use heapless::{String, Vec};
use knomipad_types::macro_kind::MacroKind;
use serde::{Deserialize, Serialize};

use crate::MACRO_PAYLOAD_SIZE;
use crate::parser::is_valid;

/// Number of factory default slots
pub const DEFAULT_SLOT_COUNT: usize = 5;

/// A macro bound to a button on the pad
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MacroSlot {
    pub id: u8,
    pub kind: MacroKind,
    pub payload: String<MACRO_PAYLOAD_SIZE>,
}

impl MacroSlot {
    /// Returns `None` if the payload doesn't fit in a slot
    pub fn new(id: u8, kind: MacroKind, payload: &str) -> Option<Self> {
        Some(Self {
            id,
            kind,
            payload: String::try_from(payload).ok()?,
        })
    }

    /// Whether the payload parses as its kind
    pub fn is_valid(&self) -> bool {
        is_valid(self.kind, &self.payload)
    }
}

const DEFAULT_SLOTS: [(MacroKind, &str); DEFAULT_SLOT_COUNT] = [
    (MacroKind::Keystroke, "LCtrl+c, 500ms, LCtrl+v"),
    (MacroKind::Typing, "This is KnomiPad (8/s)"),
    (MacroKind::Keybind, "F12"),
    (MacroKind::Keybind, "Tab"),
    (MacroKind::Keybind, "Enter"),
];

/// Slots of a freshly flashed pad
pub fn default_slots() -> Vec<MacroSlot, DEFAULT_SLOT_COUNT> {
    DEFAULT_SLOTS
        .iter()
        .zip(0u8..)
        .filter_map(|(&(kind, payload), id)| MacroSlot::new(id, kind, payload))
        .collect()
}
