use heapless::Vec;
use knomipad_types::modifier::HidModifiers;

use super::{HoldBody, HoldToken, ParseError, parse_wait};
use crate::ALT_CODE_MAX_DIGITS;
use crate::mapper::{modifier_from_name, single_key};

/// Compile `<modifiers>|<sequence>`, e.g. `LAlt | 0,1,7,9` or `LGui | 1, 200ms, Shift+Left`.
///
/// The hold side tolerates unknown names as long as one modifier resolves.
/// Unknown tokens on the sequence side are logged and skipped.
pub fn parse_holdseq(payload: &str) -> Result<(HidModifiers, HoldBody), ParseError> {
    let (hold, seq) = payload.split_once('|').ok_or(ParseError::MissingSeparator)?;

    let mut modifiers = HidModifiers::new();
    for name in hold.split('+') {
        match modifier_from_name(name) {
            Some(m) => modifiers |= m,
            None => warn!("Hold '{}' is not a modifier, ignored", name.trim()),
        }
    }
    if modifiers.is_empty() {
        return Err(ParseError::NoModifier);
    }

    let seq = seq.trim();
    let alt_held = modifiers.has_alt();
    if alt_held && is_alt_code(seq) {
        let digits = collect_digits(seq.bytes())?;
        return Ok((modifiers, HoldBody::AltCode(digits)));
    }

    let mut tokens = Vec::new();
    for token in seq.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let parsed = match parse_wait(token) {
            Ok(Some(ms)) => Some(HoldToken::Wait(ms)),
            Ok(None) if alt_held && token.bytes().all(|b| b.is_ascii_digit()) => {
                Some(HoldToken::Digits(collect_digits(token.bytes())?))
            }
            Ok(None) => parse_key(token),
            Err(_) => None,
        };
        match parsed {
            Some(t) => tokens.push(t).map_err(|_| ParseError::TooManySteps)?,
            None => warn!("Unknown hold sequence token '{}', skipped", token),
        }
    }
    Ok((modifiers, HoldBody::Tokens(tokens)))
}

/// Digits, commas and spaces only, with at least one digit
fn is_alt_code(seq: &str) -> bool {
    seq.bytes().any(|b| b.is_ascii_digit()) && seq.bytes().all(|b| b.is_ascii_digit() || b == b',' || b == b' ')
}

fn collect_digits(bytes: impl Iterator<Item = u8>) -> Result<Vec<u8, ALT_CODE_MAX_DIGITS>, ParseError> {
    let mut digits = Vec::new();
    for b in bytes.filter(u8::is_ascii_digit) {
        digits.push(b).map_err(|_| ParseError::TooManySteps)?;
    }
    Ok(digits)
}

/// `KEY` or `MOD[+MOD...]+KEY`, the key always comes last
fn parse_key(token: &str) -> Option<HoldToken> {
    let (mods, key) = match token.rsplit_once('+') {
        Some((mods, key)) => (mods, key),
        None => ("", token),
    };
    let mut extra = HidModifiers::new();
    for name in mods.split('+').filter(|n| !n.trim().is_empty()) {
        extra |= modifier_from_name(name)?;
    }
    let key = single_key(key)?;
    Some(HoldToken::Key {
        keycode: key as u8,
        extra,
    })
}
