pub mod common;

mod transport_test {
    use embassy_futures::block_on;
    use embassy_time::Duration;
    use knomipad::HidModifiers;
    use knomipad::config::TimingConfig;
    use knomipad::executor::MacroError;
    use knomipad::hid::{HidError, HidTransport};

    use crate::common::*;

    #[test]
    fn test_not_ready_sends_nothing() {
        let rig = TestRig::not_ready();
        let mut executor = rig.executor();

        assert_eq!(block_on(executor.run_keystroke("a")), Err(MacroError::NotReady));
        assert_eq!(block_on(executor.run_typing("hello")), Err(MacroError::NotReady));
        assert_eq!(block_on(executor.run_keybind("F12")), Err(MacroError::NotReady));
        assert_eq!(block_on(executor.run_holdseq("LAlt|0179")), Err(MacroError::NotReady));

        // Connected but not subscribed is still not ready
        rig.state.on_connect();
        assert_eq!(block_on(executor.run_keybind("F12")), Err(MacroError::NotReady));

        assert_eq!(rig.log.attempts(), 0);
        assert_eq!(rig.clock.now_us(), 0);
    }

    #[test]
    fn test_not_ready_checked_before_parsing() {
        let rig = TestRig::not_ready();
        let mut executor = rig.executor();
        assert_eq!(block_on(executor.run_keybind("F13")), Err(MacroError::NotReady));
    }

    #[test]
    fn test_dropped_reports_are_not_paced() {
        let rig = TestRig::ready();
        let mut transport = rig.transport();

        block_on(transport.send_report(HidModifiers::LCTRL, KC_A)).unwrap();
        assert_eq!(rig.clock.now_us(), 6_000);

        rig.state.on_disconnect();
        assert!(!transport.is_ready());
        assert_eq!(block_on(transport.send_report(HidModifiers::new(), KC_B)), Err(HidError::NotReady));
        assert_eq!(block_on(transport.release_all()), Err(HidError::NotReady));
        assert_eq!(rig.clock.now_us(), 6_000);
        assert_eq!(rig.log.keys(), vec![(KC_LCTRL, KC_A)]);
    }

    #[test]
    fn test_raw_send_uses_short_pacing() {
        let rig = TestRig::ready();
        let mut transport = rig.transport();

        block_on(transport.set_modifiers(HidModifiers::LALT)).unwrap();
        block_on(transport.send_raw(HidModifiers::LALT, KC_KP_1)).unwrap();
        block_on(transport.release_all()).unwrap();
        assert_eq!(rig.log.keys(), vec![(KC_LALT, 0), (KC_LALT, KC_KP_1), RELEASE]);
        assert_eq!(rig.log.times(), vec![0, 6_000, 6_900]);
    }

    #[test]
    fn test_writer_failure_is_reported() {
        let rig = TestRig::ready();
        let mut transport = rig.transport();
        rig.fail.set(true);
        assert_eq!(block_on(transport.send_report(HidModifiers::new(), KC_A)), Err(HidError::BleError));
        assert_eq!(rig.clock.now_us(), 0);
        assert_eq!(rig.log.attempts(), 1);
    }

    #[test]
    fn test_numlock_follows_host_leds() {
        let rig = TestRig::ready();
        let transport = rig.transport();
        assert!(!transport.numlock_on());
        rig.state.on_output_report(&[0x01]);
        assert!(transport.numlock_on());
        rig.state.on_output_report(&[0x00]);
        assert!(!transport.numlock_on());
    }

    #[test]
    fn test_disconnect_forwards_to_link() {
        let rig = TestRig::ready();
        let mut transport = rig.transport();
        transport.disconnect();
        assert_eq!(rig.disconnects.get(), 1);
    }

    #[test]
    fn test_oversized_pacing_saturates() {
        let rig = TestRig::ready();
        let timing = TimingConfig {
            report_pacing: Duration::from_secs(5_000),
            ..TimingConfig::default()
        };
        let mut transport = rig.transport_with(&timing);

        block_on(transport.send_report(HidModifiers::new(), KC_A)).unwrap();
        // 5000s doesn't fit in u32 µs, the delay is clamped instead of wrapping
        assert_eq!(rig.clock.now_us(), u64::from(u32::MAX));
    }
}
