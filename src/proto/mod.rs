//! Serial command protocol - framing, opcodes, and dispatch.
//!
//! The frame decoder turns the raw byte stream into `(command, payload)`
//! pairs; [`dispatch`] validates each payload against its command's
//! contract and produces the action the ingestion loop should take.
//! Payload violations (too short, wrong mode selector) consume the frame
//! silently - the protocol has no negative acknowledgement to send.

pub mod command;
pub mod frame;

pub use command::{Command, MODE_ABSOLUTE, MODE_RELATIVE};
pub use frame::{FrameDecoder, FrameEvent};

use crate::hid::{AbsMouseReport, HidReport, KeyboardReport, MouseReport};

/// Version bytes sent in reply to a GetInfo command, unframed.
pub const INFO_VERSION: [u8; 2] = [0x01, 0x10];

/// What the ingestion loop should do with an accepted frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Queue a HID report for the USB writer.
    Report(HidReport),
    /// Write [`INFO_VERSION`] back over the serial link.
    Info,
    /// Wait briefly, then perform a full system reset. Terminal.
    Reset,
}

/// Validate `payload` against `command`'s contract and encode the
/// resulting action. `None` is a silent no-op: the frame is consumed
/// but violates the payload contract, so nothing is emitted.
pub fn dispatch(command: Command, payload: &[u8]) -> Option<Action> {
    match command {
        Command::GetInfo => Some(Action::Info),

        Command::SendKbGeneral => {
            if payload.len() < 8 {
                return None;
            }
            let mut keycodes = [0u8; 6];
            keycodes.copy_from_slice(&payload[2..8]);
            Some(Action::Report(HidReport::Keyboard(KeyboardReport::new(
                payload[0], keycodes,
            ))))
        }

        Command::SendMouseRel => {
            if payload.len() < 5 || payload[0] != MODE_RELATIVE {
                return None;
            }
            Some(Action::Report(HidReport::Mouse(MouseReport::new(
                payload[1],
                payload[2] as i8,
                payload[3] as i8,
                payload[4] as i8,
            ))))
        }

        Command::SendMouseAbs => {
            if payload.len() < 7 || payload[0] != MODE_ABSOLUTE {
                return None;
            }
            let raw_x = u16::from_le_bytes([payload[2], payload[3]]);
            let raw_y = u16::from_le_bytes([payload[4], payload[5]]);
            Some(Action::Report(HidReport::AbsMouse(AbsMouseReport::new(
                payload[1],
                raw_x,
                raw_y,
                payload[6] as i8,
            ))))
        }

        Command::Reset => Some(Action::Reset),
    }
}
