//! # KnomiPad
//!
//! Macro execution engine of the KnomiPad, a touchscreen macro pad that
//! shows up on the host as a Bluetooth keyboard.
//!
//! A macro is a `(kind, payload)` pair. Producers (touch UI, HTTP handlers)
//! push it into a [`dispatch::MacroDispatcher`], a single worker parses the
//! payload into a [`parser::MacroPlan`] and the [`executor::MacroExecutor`]
//! plays it back as paced 8-byte keyboard reports through a
//! [`hid::BleTransport`].
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod config;
pub mod dispatch;
pub mod executor;
pub mod hid;
pub mod mapper;
pub mod parser;
pub mod slot;
pub mod state;

pub use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex as RawMutex;
pub use knomipad_types::keycode::HidKeyCode;
pub use knomipad_types::led_indicator::LedIndicator;
pub use knomipad_types::macro_kind::MacroKind;
pub use knomipad_types::modifier::HidModifiers;

/// Depth of the macro dispatch queue
pub const DISPATCH_QUEUE_SIZE: usize = 8;
/// Longest payload a macro slot can carry, in bytes
pub const MACRO_PAYLOAD_SIZE: usize = 256;
/// Maximum number of compiled steps in a keystroke macro
pub const MACRO_MAX_STEPS: usize = 64;
/// Maximum number of tokens on the right hand side of a hold sequence
pub const HOLDSEQ_MAX_TOKENS: usize = 64;
/// Maximum number of digits in one alt-code
pub const ALT_CODE_MAX_DIGITS: usize = 64;
/// Typing rate used when the payload has no `(N/s)` suffix
pub const DEFAULT_TYPING_CPS: u8 = 10;
/// Fastest accepted typing rate
pub const MAX_TYPING_CPS: u8 = 20;
