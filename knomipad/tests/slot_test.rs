pub mod common;

mod slot_test {
    use embassy_futures::block_on;
    use knomipad::MacroKind;
    use knomipad::slot::{MacroSlot, default_slots};

    use crate::common::*;

    #[test]
    fn test_slot_postcard_round_trip() {
        let slot = MacroSlot::new(3, MacroKind::HoldSeq, "LAlt | 0,1,7,9").unwrap();
        let bytes = postcard::to_allocvec(&slot).unwrap();
        let decoded: MacroSlot = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, slot);
        assert!(decoded.is_valid());
    }

    #[test]
    fn test_macro_kind_names() {
        for kind in [MacroKind::Keystroke, MacroKind::Typing, MacroKind::Keybind, MacroKind::HoldSeq] {
            assert_eq!(kind.as_str().parse::<MacroKind>(), Ok(kind));
        }
        assert_eq!(MacroKind::HoldSeq.as_str(), "holdseq");
        assert_eq!("TYPING".parse::<MacroKind>(), Ok(MacroKind::Typing));
        assert!("macro".parse::<MacroKind>().is_err());
        assert_eq!(MacroKind::from_name_or_default("macro"), MacroKind::Keystroke);
    }

    #[test]
    fn test_run_default_slot() {
        let rig = TestRig::ready();
        let mut executor = rig.executor();
        let slots = default_slots();

        block_on(executor.run_slot(&slots[2])).unwrap();
        assert_eq!(rig.log.keys(), vec![(0, KC_F12), RELEASE]);

        block_on(executor.run_slot(&slots[0])).unwrap();
        assert_eq!(rig.log.len(), 6);
    }
}
