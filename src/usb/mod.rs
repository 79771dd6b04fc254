//! USB Device subsystem - presents a composite HID device to the host.
//!
//! One HID interface carries three input functions, distinguished by
//! report ID:
//!
//! - Report ID 1: Keyboard
//! - Report ID 2: Relative mouse
//! - Report ID 3: Absolute (tablet-style) mouse
//!
//! `descriptor` assembles the composite configuration descriptor and the
//! interface's report descriptor at start-up; `hid_device` drives the
//! nRF52840's USB controller via `embassy-usb` and drains the
//! serial→USB report channel into the interrupt-IN endpoint.

pub mod descriptor;

#[cfg(feature = "embedded")]
pub mod hid_device;
