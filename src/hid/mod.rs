//! HID report types - the serial-command → USB translation layer.
//!
//! Each report struct packs validated command parameters into the
//! byte-exact layout its report descriptor declares. All three
//! functions share one HID interface, so every report travels with its
//! report ID.

pub mod abs_mouse;
pub mod keyboard;
pub mod mouse;


pub use abs_mouse::AbsMouseReport;
pub use keyboard::KeyboardReport;
pub use mouse::MouseReport;

/// Report ID of the keyboard function.
pub const REPORT_ID_KEYBOARD: u8 = 1;
/// Report ID of the relative mouse function.
pub const REPORT_ID_MOUSE_REL: u8 = 2;
/// Report ID of the absolute mouse function.
pub const REPORT_ID_MOUSE_ABS: u8 = 3;

/// Largest serialized report size across the three functions (keyboard).
pub const MAX_REPORT_SIZE: usize = keyboard::KEYBOARD_REPORT_SIZE;

/// One encoded HID input report, ready for the USB writer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidReport {
    Keyboard(KeyboardReport),
    Mouse(MouseReport),
    AbsMouse(AbsMouseReport),
}

impl HidReport {
    /// The report ID this report is sent under.
    pub fn report_id(&self) -> u8 {
        match self {
            HidReport::Keyboard(_) => REPORT_ID_KEYBOARD,
            HidReport::Mouse(_) => REPORT_ID_MOUSE_REL,
            HidReport::AbsMouse(_) => REPORT_ID_MOUSE_ABS,
        }
    }

    /// Serialise the report body (without the report ID prefix).
    /// Returns the number of bytes written, or 0 if `buf` is too small.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        match self {
            HidReport::Keyboard(k) => k.serialize(buf),
            HidReport::Mouse(m) => m.serialize(buf),
            HidReport::AbsMouse(m) => m.serialize(buf),
        }
    }

    pub fn is_keyboard(&self) -> bool {
        matches!(self, HidReport::Keyboard(_))
    }

    pub fn is_mouse(&self) -> bool {
        matches!(self, HidReport::Mouse(_))
    }

    pub fn is_abs_mouse(&self) -> bool {
        matches!(self, HidReport::AbsMouse(_))
    }
}
