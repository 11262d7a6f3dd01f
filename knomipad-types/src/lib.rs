//! # KnomiPad Types
//!
//! Fundamental type definitions shared by the KnomiPad firmware and the
//! components around it (storage, configuration API, UI).
//!
//! ## Modules
//!
//! - [`keycode`] - HID keyboard usages the macro pad emits
//! - [`modifier`] - Modifier byte of a boot keyboard report
//! - [`led_indicator`] - Host LED output report
//! - [`macro_kind`] - The four macro grammars and their names

#![cfg_attr(not(test), no_std)]

pub mod keycode;
pub mod led_indicator;
pub mod macro_kind;
pub mod modifier;
