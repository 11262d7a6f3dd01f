use heapless::Vec;

use super::{KeyStep, ParseError, parse_combo, parse_wait};
use crate::MACRO_MAX_STEPS;

/// Compile `LCtrl+c, 500ms, LCtrl+v` style payloads.
///
/// A wait is folded into the step before it. A leading wait becomes a pure
/// delay step, so `500ms, 200ms, A` is a 700ms delay followed by `A`.
pub fn parse_keystroke(payload: &str) -> Result<Vec<KeyStep, MACRO_MAX_STEPS>, ParseError> {
    let mut steps: Vec<KeyStep, MACRO_MAX_STEPS> = Vec::new();
    for token in payload.split(',') {
        let token = token.trim();
        if token.is_empty() {
            return Err(ParseError::EmptyToken);
        }

        if let Some(wait_ms) = parse_wait(token)? {
            match steps.last_mut() {
                Some(step) => step.wait_ms = step.wait_ms.saturating_add(wait_ms),
                None => steps.push(KeyStep::delay(wait_ms)).map_err(|_| ParseError::TooManySteps)?,
            }
            continue;
        }

        let combo = parse_combo(token)?;
        steps.push(KeyStep::tap(combo)).map_err(|_| ParseError::TooManySteps)?;
    }
    Ok(steps)
}
