/// Why a macro payload was rejected.
///
/// Any of these aborts the run before a single report is sent.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Empty token between two commas, or an empty payload
    EmptyToken,
    /// Token ends like a wait but the number is malformed
    InvalidWait,
    UnknownKey,
    /// More than one non-modifier key in one `+` group
    MultipleKeys,
    /// Combo made of modifiers only
    NoKey,
    /// Typing rate isn't `<N>/s`
    InvalidRate,
    /// Typing rate outside `1..=20`
    RateOutOfRange,
    /// Text after the typing rate
    TrailingText,
    /// Typing rate without a closing `)`
    UnclosedParen,
    /// Hold sequence without `|`
    MissingSeparator,
    /// Hold sequence whose left side has no known modifier
    NoModifier,
    TooManySteps,
    PayloadTooLong,
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            ParseError::EmptyToken => "empty token",
            ParseError::InvalidWait => "malformed wait token",
            ParseError::UnknownKey => "unknown key name",
            ParseError::MultipleKeys => "more than one key in a combo",
            ParseError::NoKey => "combo has no key",
            ParseError::InvalidRate => "typing rate must be (N/s)",
            ParseError::RateOutOfRange => "typing rate must be between 1 and 20",
            ParseError::TrailingText => "text after the typing rate",
            ParseError::UnclosedParen => "missing ')'",
            ParseError::MissingSeparator => "hold sequence needs '|'",
            ParseError::NoModifier => "no valid modifier to hold",
            ParseError::TooManySteps => "too many steps",
            ParseError::PayloadTooLong => "payload too long",
        };
        f.write_str(msg)
    }
}
