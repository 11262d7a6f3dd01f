use heapless::String;

use super::ParseError;
use crate::{DEFAULT_TYPING_CPS, MACRO_PAYLOAD_SIZE, MAX_TYPING_CPS};

/// Split `Hello (8/s)` into the text to type and the rate in characters per second.
///
/// Only the last `(` starts a rate, earlier parentheses are typed as text.
/// Without one the whole trimmed payload is typed at the default rate.
pub fn parse_typing(payload: &str) -> Result<(String<MACRO_PAYLOAD_SIZE>, u8), ParseError> {
    let payload = payload.trim();
    let (text, cps) = match payload.rfind('(') {
        Some(open) => {
            let rest = &payload[open + 1..];
            let close = rest.find(')').ok_or(ParseError::UnclosedParen)?;
            let cps = parse_rate(&rest[..close])?;
            if !rest[close + 1..].trim().is_empty() {
                return Err(ParseError::TrailingText);
            }
            (payload[..open].trim(), cps)
        }
        None => (payload, DEFAULT_TYPING_CPS),
    };
    let text = String::try_from(text).map_err(|_| ParseError::PayloadTooLong)?;
    Ok((text, cps))
}

/// `<digits>/s`, unit in any case. `/s` must be written without a gap.
fn parse_rate(rate: &str) -> Result<u8, ParseError> {
    let rate = rate.trim();
    let bytes = rate.as_bytes();
    if bytes.len() < 2 || !bytes[bytes.len() - 2..].eq_ignore_ascii_case(b"/s") {
        return Err(ParseError::InvalidRate);
    }
    let number = rate[..rate.len() - 2].trim();
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidRate);
    }
    let value = number
        .bytes()
        .fold(0u32, |acc, b| acc.saturating_mul(10).saturating_add(u32::from(b - b'0')));
    match u8::try_from(value) {
        Ok(cps) if (1..=MAX_TYPING_CPS).contains(&cps) => Ok(cps),
        _ => Err(ParseError::RateOutOfRange),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_bounds() {
        assert_eq!(parse_typing("Hi (21/s)"), Err(ParseError::RateOutOfRange));
        assert_eq!(parse_typing("Hi (0/s)"), Err(ParseError::RateOutOfRange));
        assert_eq!(parse_typing("Hi (300/s)"), Err(ParseError::RateOutOfRange));
        let (text, cps) = parse_typing("Hi (20/s)").unwrap();
        assert_eq!(text.as_str(), "Hi");
        assert_eq!(cps, 20);
        assert_eq!(parse_typing("Hi(1/S)").map(|(_, cps)| cps), Ok(1));
    }

    #[test]
    fn test_default_rate() {
        let (text, cps) = parse_typing("  Hello world \n").unwrap();
        assert_eq!(text.as_str(), "Hello world");
        assert_eq!(cps, DEFAULT_TYPING_CPS);

        let (text, cps) = parse_typing("This is KnomiPad (8/s)").unwrap();
        assert_eq!(text.as_str(), "This is KnomiPad");
        assert_eq!(cps, 8);
    }

    #[test]
    fn test_rate_syntax() {
        assert_eq!(parse_typing("Hi ( 8 /s )").map(|(_, cps)| cps), Ok(8));
        assert_eq!(parse_typing("Hi (8/ s)"), Err(ParseError::InvalidRate));
        assert_eq!(parse_typing("Hi ( 8 / s )"), Err(ParseError::InvalidRate));
        assert_eq!(parse_typing("Hi (8/s/s)"), Err(ParseError::InvalidRate));
        assert_eq!(parse_typing("Hi (8/s) more"), Err(ParseError::TrailingText));
        assert_eq!(parse_typing("Hi (8/s"), Err(ParseError::UnclosedParen));
        assert_eq!(parse_typing("Hi (fast)"), Err(ParseError::InvalidRate));
        assert_eq!(parse_typing("Hi (/s)"), Err(ParseError::InvalidRate));
        assert_eq!(parse_typing("Hi (8/m)"), Err(ParseError::InvalidRate));
        // Last parenthesis wins
        let (text, cps) = parse_typing("a (b) (5/s)").unwrap();
        assert_eq!(text.as_str(), "a (b)");
        assert_eq!(cps, 5);
    }

    #[test]
    fn test_unmapped_characters_are_kept() {
        let (text, _) = parse_typing("Hi! ¿qué?").unwrap();
        assert_eq!(text.as_str(), "Hi! ¿qué?");
    }
}
