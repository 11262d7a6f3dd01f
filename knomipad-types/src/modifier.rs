use core::ops::{BitOr, BitOrAssign};

use bitfield_struct::bitfield;
use serde::{Deserialize, Serialize};

/// Modifier byte of a boot keyboard report, one bit per physical modifier.
///
/// | bit7 | bit6 | bit5 | bit4 | bit3 | bit2 | bit1 | bit0 |
/// | --- | --- | --- | --- | --- | --- | --- | --- |
/// | RGUI | RALT | RSHIFT | RCTRL | LGUI | LALT | LSHIFT | LCTRL |
#[bitfield(u8, order = Lsb, defmt = cfg(feature = "defmt"))]
#[derive(Eq, PartialEq, Serialize, Deserialize)]
pub struct HidModifiers {
    #[bits(1)]
    pub left_ctrl: bool,
    #[bits(1)]
    pub left_shift: bool,
    #[bits(1)]
    pub left_alt: bool,
    #[bits(1)]
    pub left_gui: bool,
    #[bits(1)]
    pub right_ctrl: bool,
    #[bits(1)]
    pub right_shift: bool,
    #[bits(1)]
    pub right_alt: bool,
    #[bits(1)]
    pub right_gui: bool,
}

impl BitOr for HidModifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.into_bits() | rhs.into_bits())
    }
}
impl BitOrAssign for HidModifiers {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

impl HidModifiers {
    pub const LCTRL: Self = Self::new().with_left_ctrl(true);
    pub const LSHIFT: Self = Self::new().with_left_shift(true);
    pub const LALT: Self = Self::new().with_left_alt(true);
    pub const LGUI: Self = Self::new().with_left_gui(true);
    pub const RCTRL: Self = Self::new().with_right_ctrl(true);
    pub const RSHIFT: Self = Self::new().with_right_shift(true);
    pub const RALT: Self = Self::new().with_right_alt(true);
    pub const RGUI: Self = Self::new().with_right_gui(true);

    /// No modifier held
    pub fn is_empty(self) -> bool {
        self.into_bits() == 0
    }

    /// Either Alt key is held. Alt-code entry works with both.
    pub fn has_alt(self) -> bool {
        self.left_alt() || self.right_alt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_bits_match_boot_report() {
        assert_eq!(HidModifiers::LCTRL.into_bits(), 0x01);
        assert_eq!(HidModifiers::LSHIFT.into_bits(), 0x02);
        assert_eq!(HidModifiers::LALT.into_bits(), 0x04);
        assert_eq!(HidModifiers::LGUI.into_bits(), 0x08);
        assert_eq!(HidModifiers::RCTRL.into_bits(), 0x10);
        assert_eq!(HidModifiers::RALT.into_bits(), 0x40);
        assert_eq!((HidModifiers::LCTRL | HidModifiers::LSHIFT).into_bits(), 0x03);
    }

    #[test]
    fn test_has_alt() {
        assert!(HidModifiers::LALT.has_alt());
        assert!((HidModifiers::RALT | HidModifiers::LCTRL).has_alt());
        assert!(!HidModifiers::LGUI.has_alt());
        assert!(HidModifiers::new().is_empty());
    }
}
