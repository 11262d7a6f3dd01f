//! Token vocabulary of the macro grammars.
//!
//! All lookups are case-insensitive and ignore surrounding whitespace. Tokens
//! are short, so they are upper-cased into a small stack buffer instead of
//! allocating.
use heapless::String;
use knomipad_types::keycode::HidKeyCode;
use knomipad_types::modifier::HidModifiers;

/// Longest token worth looking up, anything longer can't be in the vocabulary
const MAX_TOKEN_LEN: usize = 16;

/// A single combo: at most one non-modifier key plus modifiers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParsedCombo {
    /// HID usage of the key, 0 for a modifier-only token
    pub keycode: u8,
    pub modifiers: HidModifiers,
}

impl ParsedCombo {
    pub fn key(key: HidKeyCode) -> Self {
        Self {
            keycode: key.into(),
            modifiers: HidModifiers::new(),
        }
    }

    pub fn modifier(modifiers: HidModifiers) -> Self {
        Self { keycode: 0, modifiers }
    }

    pub fn has_key(&self) -> bool {
        self.keycode != 0
    }
}

fn normalize(token: &str) -> Option<String<MAX_TOKEN_LEN>> {
    let mut upper = String::new();
    for c in token.trim().chars() {
        upper.push(c.to_ascii_uppercase()).ok()?;
    }
    Some(upper)
}

/// Parses `F<n>`, the number must be all digits
fn function_number(token: &str) -> Option<u8> {
    let digits = token.strip_prefix('F')?;
    if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Single letter or top row digit
fn single_char_key(token: &str) -> Option<HidKeyCode> {
    let mut chars = token.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    HidKeyCode::from_letter(c).or_else(|| HidKeyCode::from_digit(c))
}

/// Modifier names, including the right-hand variants and common aliases.
pub fn modifier_from_name(token: &str) -> Option<HidModifiers> {
    let token = normalize(token)?;
    let modifiers = match token.as_str() {
        "LCTRL" | "CTRL" | "CONTROL" => HidModifiers::LCTRL,
        "LSHIFT" | "SHIFT" => HidModifiers::LSHIFT,
        "LALT" | "ALT" => HidModifiers::LALT,
        "LGUI" | "GUI" | "LWIN" | "WIN" | "CMD" => HidModifiers::LGUI,
        "RCTRL" => HidModifiers::RCTRL,
        "RSHIFT" => HidModifiers::RSHIFT,
        "RALT" => HidModifiers::RALT,
        "RGUI" | "RWIN" => HidModifiers::RGUI,
        _ => return None,
    };
    Some(modifiers)
}

/// Resolve one token of a keystroke or keybind combo.
///
/// Vocabulary: letters, digits, `F1`-`F12`, `ENTER`, `ESC`/`ESCAPE`, `TAB`,
/// `SPACE` and the modifier names. `None` means the token is unknown and the
/// whole combo must be rejected.
pub fn map_token(token: &str) -> Option<ParsedCombo> {
    let upper = normalize(token)?;
    let key = match upper.as_str() {
        "ENTER" => HidKeyCode::Enter,
        "ESC" | "ESCAPE" => HidKeyCode::Escape,
        "TAB" => HidKeyCode::Tab,
        "SPACE" => HidKeyCode::Space,
        other => {
            if let Some(modifiers) = modifier_from_name(other) {
                return Some(ParsedCombo::modifier(modifiers));
            }
            match function_number(other) {
                Some(n @ 1..=12) => HidKeyCode::function(n)?,
                Some(_) => return None,
                None => single_char_key(other)?,
            }
        }
    };
    Some(ParsedCombo::key(key))
}

/// Key names accepted inside a hold sequence.
///
/// Wider than [`map_token`]: function keys go up to `F24` and navigation keys
/// are included, but modifiers are not keys here.
pub fn single_key(token: &str) -> Option<HidKeyCode> {
    let upper = normalize(token)?;
    let key = match upper.as_str() {
        "TAB" => HidKeyCode::Tab,
        "ENTER" | "RETURN" => HidKeyCode::Enter,
        "ESC" | "ESCAPE" => HidKeyCode::Escape,
        "SPACE" | "SPACEBAR" => HidKeyCode::Space,
        "BACKSPACE" => HidKeyCode::Backspace,
        "DELETE" | "DEL" => HidKeyCode::Delete,
        "HOME" => HidKeyCode::Home,
        "END" => HidKeyCode::End,
        "PGUP" | "PAGEUP" => HidKeyCode::PageUp,
        "PGDN" | "PAGEDOWN" => HidKeyCode::PageDown,
        "LEFT" => HidKeyCode::Left,
        "RIGHT" => HidKeyCode::Right,
        "UP" => HidKeyCode::Up,
        "DOWN" => HidKeyCode::Down,
        other => match function_number(other) {
            Some(n) => HidKeyCode::function(n)?,
            None => single_char_key(other)?,
        },
    };
    Some(key)
}

/// US layout mapping of the characters the typing macro can produce.
///
/// Only letters, digits, space, newline, tab, `-` and `=` are supported.
pub fn char_to_key(c: char) -> Option<(HidKeyCode, HidModifiers)> {
    let unshifted = |key| Some((key, HidModifiers::new()));
    match c {
        'a'..='z' => unshifted(HidKeyCode::from_letter(c)?),
        'A'..='Z' => Some((HidKeyCode::from_letter(c)?, HidModifiers::LSHIFT)),
        '0'..='9' => unshifted(HidKeyCode::from_digit(c)?),
        ' ' => unshifted(HidKeyCode::Space),
        '\n' => unshifted(HidKeyCode::Enter),
        '\t' => unshifted(HidKeyCode::Tab),
        '-' => unshifted(HidKeyCode::Minus),
        '=' => unshifted(HidKeyCode::Equal),
        _ => None,
    }
}
