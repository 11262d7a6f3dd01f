use super::{ParseError, parse_combo};
use crate::mapper::ParsedCombo;

/// A keybind is exactly one combo, e.g. `F12` or `LGui+L`
pub fn parse_keybind(payload: &str) -> Result<ParsedCombo, ParseError> {
    parse_combo(payload)
}
