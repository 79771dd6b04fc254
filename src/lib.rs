//! serial2usb - serial-to-USB HID bridge core.
//!
//! A host machine sends CH9329-style binary command frames over a UART;
//! the device replays them as USB HID input (keyboard, relative mouse,
//! absolute mouse). The protocol and encoding logic in this library is
//! pure and testable on the host (no embedded hardware required):
//!
//! - [`proto`] - frame decoding, opcode table, command dispatch
//! - [`hid`] - HID report packing and report descriptors
//! - [`usb::descriptor`] - composite USB descriptor assembly
//!
//! Usage: `cargo test`
//!
//! The embedded binary (main.rs, built with `--features embedded`)
//! wires these modules to the nRF52840 UARTE and USB peripherals via
//! the Embassy stack.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod error;
pub mod hid;
pub mod proto;
pub mod usb;

#[cfg(feature = "embedded")]
pub mod serial;

// ═══════════════════════════════════════════════════════════════════════════
// Cross-module unit tests - command dispatch contracts
// ═══════════════════════════════════════════════════════════════════════════
