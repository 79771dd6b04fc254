//! Unified error type for serial2usb.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging when the
//! `defmt` feature is enabled.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // USB
    /// The composite configuration descriptor would exceed its fixed
    /// capacity. Initialization must not proceed to enumeration.
    DescriptorOverflow,

    /// USB stack returned an error.
    Usb,

    // Serial
    /// UART read/write failed.
    Serial,

    // Generic
    /// Buffer too small for the requested operation.
    BufferOverflow,
}
