use embassy_time::Duration;

/// Tunable configuration of the macro engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct MacroConfig {
    pub timing: TimingConfig,
}

/// Delays used while playing a macro back.
///
/// Hosts coalesce or drop keys that are released too quickly, so these are
/// lower bounds that were found to work across Windows, macOS, Linux and
/// Android hosts.
#[derive(Clone, Copy, Debug)]
pub struct TimingConfig {
    /// Time a key is held in keystroke and keybind macros
    pub key_hold: Duration,
    /// Pause after a key is released in keystroke and keybind macros
    pub key_settle: Duration,
    /// Time a character key is held while typing
    pub typing_hold: Duration,
    /// Time a key is held inside a hold sequence
    pub holdseq_tap_hold: Duration,
    /// Pause after a hold sequence presses or releases its modifiers
    pub holdseq_modifier_settle: Duration,
    /// Time NumLock is held when it's toggled for alt-code entry
    pub numlock_hold: Duration,
    /// Pause around a NumLock toggle, gives the host time to update its LED state
    pub numlock_settle: Duration,
    /// Pause after every report
    pub report_pacing: Duration,
    /// Pause after every report of an alt-code burst
    pub raw_report_pacing: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            key_hold: Duration::from_millis(15),
            key_settle: Duration::from_millis(8),
            typing_hold: Duration::from_millis(5),
            holdseq_tap_hold: Duration::from_millis(8),
            holdseq_modifier_settle: Duration::from_millis(6),
            numlock_hold: Duration::from_millis(12),
            numlock_settle: Duration::from_millis(20),
            report_pacing: Duration::from_millis(6),
            raw_report_pacing: Duration::from_micros(900),
        }
    }
}
