//! USB descriptor assembly.
//!
//! The device enumerates as a composite device: one configuration whose
//! descriptor is concatenated at start-up from independent per-function
//! fragments, each declaring how many interfaces it adds. Today there is
//! a single HID function; further functions (a CDC console, vendor
//! endpoints) append as additional fragments without touching the
//! builder.
//!
//! The HID interface serves one composite *report* descriptor covering
//! all three input functions, distinguished by report ID; see
//! [`write_report_descriptor`].
//!
//! Assembly must finish before the blob is handed to the USB stack for
//! enumeration; the composite is read-only from then on.

use heapless::Vec;

use crate::config::{USB_HID_EP_SIZE, USB_HID_POLL_MS};
use crate::error::Error;
use crate::hid::abs_mouse::ABS_MOUSE_REPORT_DESCRIPTOR;
use crate::hid::keyboard::KEYBOARD_REPORT_DESCRIPTOR;
use crate::hid::mouse::MOUSE_REPORT_DESCRIPTOR;

/// Backing capacity of the composite configuration descriptor.
pub const CONFIG_DESC_CAPACITY: usize = 256;

/// Size of the configuration descriptor header.
pub const CONFIG_HEADER_LEN: usize = 9;

/// Size of one HID function fragment (interface + HID class + endpoint).
pub const HID_FRAGMENT_LEN: usize = 25;

/// Interrupt-IN endpoint address of the HID interface.
pub const HID_ENDPOINT_IN: u8 = 0x81;

// Configuration header fields.
const DESC_TYPE_CONFIGURATION: u8 = 0x02;
const DESC_TYPE_INTERFACE: u8 = 0x04;
const DESC_TYPE_ENDPOINT: u8 = 0x05;
const DESC_TYPE_HID: u8 = 0x21;
const DESC_TYPE_HID_REPORT: u8 = 0x22;
const USB_CLASS_HID: u8 = 0x03;
// Bus powered (bit 7 always set) + remote wakeup.
const CONFIG_ATTRIBUTES: u8 = 0x80 | 0x20;
// bMaxPower is in 2 mA units.
const CONFIG_MAX_POWER_2MA: u8 = 100 / 2;

/// One per-function slice of the configuration descriptor.
pub struct DescriptorFragment<'a> {
    /// Raw descriptor bytes of the function.
    pub bytes: &'a [u8],
    /// How many interfaces the fragment declares.
    pub interfaces: u8,
}

/// The composite configuration descriptor, grown append-only from
/// fragments. The header's total-length and interface-count fields
/// track every append.
pub struct ConfigDescriptor {
    buf: Vec<u8, CONFIG_DESC_CAPACITY>,
}

impl ConfigDescriptor {
    /// An empty composite: just the configuration header, declaring no
    /// interfaces yet.
    pub fn new() -> Self {
        let mut buf = Vec::new();
        let header: [u8; CONFIG_HEADER_LEN] = [
            CONFIG_HEADER_LEN as u8,       // bLength
            DESC_TYPE_CONFIGURATION,       // bDescriptorType
            CONFIG_HEADER_LEN as u8, 0x00, // wTotalLength (LE), tracks appends
            0x00,                          // bNumInterfaces, tracks appends
            0x01,                          // bConfigurationValue
            0x00,                          // iConfiguration (no string)
            CONFIG_ATTRIBUTES,             // bmAttributes
            CONFIG_MAX_POWER_2MA,          // bMaxPower
        ];
        // Capacity is compile-time larger than the header.
        let _ = buf.extend_from_slice(&header);
        Self { buf }
    }

    /// Append one function fragment, growing the total length and the
    /// interface count. Fails without touching the composite if the
    /// fragment does not fit.
    pub fn append(&mut self, fragment: &DescriptorFragment<'_>) -> Result<(), Error> {
        self.buf
            .extend_from_slice(fragment.bytes)
            .map_err(|()| Error::DescriptorOverflow)?;
        let total = self.buf.len() as u16;
        self.buf[2..4].copy_from_slice(&total.to_le_bytes());
        self.buf[4] += fragment.interfaces;
        Ok(())
    }

    /// Assemble a composite from an ordered fragment list. Any overflow
    /// aborts assembly; the device must not enumerate in that case.
    pub fn build(fragments: &[DescriptorFragment<'_>]) -> Result<Self, Error> {
        let mut desc = Self::new();
        for fragment in fragments {
            desc.append(fragment)?;
        }
        Ok(desc)
    }

    /// The assembled descriptor bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Value of the header's wTotalLength field.
    pub fn total_length(&self) -> u16 {
        u16::from_le_bytes([self.buf[2], self.buf[3]])
    }

    /// Value of the header's bNumInterfaces field.
    pub fn num_interfaces(&self) -> u8 {
        self.buf[4]
    }
}

impl Default for ConfigDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the HID function fragment: interface descriptor, HID class
/// descriptor, and the interrupt-IN endpoint. Declares one interface.
pub fn hid_interface_fragment(interface: u8, report_desc_len: u16) -> [u8; HID_FRAGMENT_LEN] {
    let [len_lo, len_hi] = report_desc_len.to_le_bytes();
    let [ep_lo, ep_hi] = USB_HID_EP_SIZE.to_le_bytes();
    [
        // Interface descriptor
        0x09,                // bLength
        DESC_TYPE_INTERFACE, // bDescriptorType
        interface,           // bInterfaceNumber
        0x00,                // bAlternateSetting
        0x01,                // bNumEndpoints
        USB_CLASS_HID,       // bInterfaceClass
        0x00,                // bInterfaceSubClass (no boot protocol)
        0x00,                // bInterfaceProtocol
        0x00,                // iInterface (no string)
        // HID class descriptor
        0x09,                 // bLength
        DESC_TYPE_HID,        // bDescriptorType
        0x11, 0x01,           // bcdHID 1.11 (LE)
        0x00,                 // bCountryCode
        0x01,                 // bNumDescriptors
        DESC_TYPE_HID_REPORT, // bDescriptorType (report)
        len_lo, len_hi,       // wDescriptorLength
        // Endpoint descriptor
        0x07,               // bLength
        DESC_TYPE_ENDPOINT, // bDescriptorType
        HID_ENDPOINT_IN,    // bEndpointAddress
        0x03,               // bmAttributes (interrupt)
        ep_lo, ep_hi,       // wMaxPacketSize
        USB_HID_POLL_MS,    // bInterval
    ]
}

/// Total size of the composite HID report descriptor.
pub fn report_descriptor_len() -> usize {
    KEYBOARD_REPORT_DESCRIPTOR.len()
        + MOUSE_REPORT_DESCRIPTOR.len()
        + ABS_MOUSE_REPORT_DESCRIPTOR.len()
}

/// Concatenate the three per-function report descriptor fragments into
/// the single report descriptor the HID interface serves. Returns the
/// number of bytes written, or 0 if `buf` is too small.
pub fn write_report_descriptor(buf: &mut [u8]) -> usize {
    let total = report_descriptor_len();
    if buf.len() < total {
        return 0;
    }
    let mut at = 0;
    for fragment in [
        KEYBOARD_REPORT_DESCRIPTOR,
        MOUSE_REPORT_DESCRIPTOR,
        ABS_MOUSE_REPORT_DESCRIPTOR,
    ] {
        buf[at..at + fragment.len()].copy_from_slice(fragment);
        at += fragment.len();
    }
    total
}

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests (run on host, not embedded)
// ═══════════════════════════════════════════════════════════════════════════
