use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// The four macro grammars a slot payload can be written in.
///
/// The lowercase names are what storage and the configuration API use.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MacroKind {
    /// Comma separated combos and waits, e.g. `LCtrl+c, 500ms, LCtrl+v`
    #[default]
    Keystroke,
    /// Free text with an optional `(N/s)` rate suffix
    Typing,
    /// A single combo
    Keybind,
    /// Modifiers held around a sequence, e.g. `LAlt | 0,1,7,9`
    HoldSeq,
}

impl MacroKind {
    /// Lenient conversion used when reading stored slots: unknown names fall
    /// back to [`MacroKind::Keystroke`].
    pub fn from_name_or_default(name: &str) -> Self {
        name.trim().parse().unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}
