//! Application-wide constants and compile-time configuration.
//!
//! All timing parameters, buffer sizes, and device-identity constants
//! live here so they can be tuned in one place.

// Serial link

/// UART baud rate of the command link.
pub const SERIAL_BAUD: u32 = 57_600;

/// Receive buffer capacity in bytes.
///
/// The largest well-formed frame is 5 header bytes + 255 data bytes +
/// 1 checksum byte = 261; a little headroom on top of that.
pub const RX_BUFFER_CAPACITY: usize = 265;

/// Delay between accepting a reset command and performing the system
/// reset, so the serial peripheral can drain.
pub const RESET_DELAY_MS: u64 = 100;

// USB

/// USB VID/PID.
pub const USB_VID: u16 = 0x16d0;
pub const USB_PID: u16 = 0x10a9;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "serial2usb";
pub const USB_PRODUCT: &str = "Serial-to-USB HID Bridge";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// USB HID polling interval (ms).
pub const USB_HID_POLL_MS: u8 = 10;

/// Interrupt-IN endpoint packet size for the HID interface.
pub const USB_HID_EP_SIZE: u16 = 64;

// GPIO pin assignments (nRF52840-DK defaults)
//
//   UART TXD  → P0.06
//   UART RXD  → P0.08
//
// Adjust for your custom PCB; the concrete `embassy_nrf::peripherals::*`
// types are selected in `main.rs`.
