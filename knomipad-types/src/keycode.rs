use serde::{Deserialize, Serialize};
use strum::FromRepr;

/// Keyboard/Keypad page usages the macro pad can emit.
///
/// Only the usages reachable from the macro grammars are listed; gaps in the
/// numbering are usages the pad never sends. Modifiers travel in the report's
/// modifier byte, see [`HidModifiers`](crate::modifier::HidModifiers).
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, PartialOrd, Ord, FromRepr)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidKeyCode {
    A = 0x04,
    B = 0x05,
    C = 0x06,
    D = 0x07,
    E = 0x08,
    F = 0x09,
    G = 0x0A,
    H = 0x0B,
    I = 0x0C,
    J = 0x0D,
    K = 0x0E,
    L = 0x0F,
    M = 0x10,
    N = 0x11,
    O = 0x12,
    P = 0x13,
    Q = 0x14,
    R = 0x15,
    S = 0x16,
    T = 0x17,
    U = 0x18,
    V = 0x19,
    W = 0x1A,
    X = 0x1B,
    Y = 0x1C,
    Z = 0x1D,
    /// `1` and `!`
    Kc1 = 0x1E,
    Kc2 = 0x1F,
    Kc3 = 0x20,
    Kc4 = 0x21,
    Kc5 = 0x22,
    Kc6 = 0x23,
    Kc7 = 0x24,
    Kc8 = 0x25,
    Kc9 = 0x26,
    /// `0` and `)`
    Kc0 = 0x27,
    Enter = 0x28,
    Escape = 0x29,
    Backspace = 0x2A,
    Tab = 0x2B,
    Space = 0x2C,
    /// `-` and `_`
    Minus = 0x2D,
    /// `=` and `+`
    Equal = 0x2E,
    F1 = 0x3A,
    F2 = 0x3B,
    F3 = 0x3C,
    F4 = 0x3D,
    F5 = 0x3E,
    F6 = 0x3F,
    F7 = 0x40,
    F8 = 0x41,
    F9 = 0x42,
    F10 = 0x43,
    F11 = 0x44,
    F12 = 0x45,
    Home = 0x4A,
    PageUp = 0x4B,
    Delete = 0x4C,
    End = 0x4D,
    PageDown = 0x4E,
    Right = 0x4F,
    Left = 0x50,
    Down = 0x51,
    Up = 0x52,
    NumLock = 0x53,
    /// `1` on keypad
    Kp1 = 0x59,
    Kp2 = 0x5A,
    Kp3 = 0x5B,
    Kp4 = 0x5C,
    Kp5 = 0x5D,
    Kp6 = 0x5E,
    Kp7 = 0x5F,
    Kp8 = 0x60,
    Kp9 = 0x61,
    /// `0` on keypad
    Kp0 = 0x62,
    F13 = 0x68,
    F14 = 0x69,
    F15 = 0x6A,
    F16 = 0x6B,
    F17 = 0x6C,
    F18 = 0x6D,
    F19 = 0x6E,
    F20 = 0x6F,
    F21 = 0x70,
    F22 = 0x71,
    F23 = 0x72,
    F24 = 0x73,
}

impl HidKeyCode {
    /// Letter key for an ASCII letter of either case.
    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'a'..='z' => Self::from_repr(HidKeyCode::A as u8 + (c as u8 - b'a')),
            'A'..='Z' => Self::from_repr(HidKeyCode::A as u8 + (c as u8 - b'A')),
            _ => None,
        }
    }

    /// Top row digit key. HID orders the row `1..9, 0`.
    pub fn from_digit(c: char) -> Option<Self> {
        match c {
            '0' => Some(HidKeyCode::Kc0),
            '1'..='9' => Self::from_repr(HidKeyCode::Kc1 as u8 + (c as u8 - b'1')),
            _ => None,
        }
    }

    /// Numeric keypad digit key, same `1..9, 0` ordering as the top row.
    pub fn from_keypad_digit(c: char) -> Option<Self> {
        match c {
            '0' => Some(HidKeyCode::Kp0),
            '1'..='9' => Self::from_repr(HidKeyCode::Kp1 as u8 + (c as u8 - b'1')),
            _ => None,
        }
    }

    /// `F<n>` for `n` in `1..=24`. F13 and up live in a separate usage block.
    pub fn function(n: u8) -> Option<Self> {
        match n {
            1..=12 => Self::from_repr(HidKeyCode::F1 as u8 + (n - 1)),
            13..=24 => Self::from_repr(HidKeyCode::F13 as u8 + (n - 13)),
            _ => None,
        }
    }
}

impl From<HidKeyCode> for u8 {
    fn from(key: HidKeyCode) -> Self {
        key as u8
    }
}
