//! Serial ingestion loop - drives the frame decoder and dispatcher.
//!
//! Owns both halves of the UARTE exclusively: the RX half feeds the
//! frame decoder one byte at a time, the TX half carries GetInfo
//! replies. Encoded HID reports go to the USB writer task over the
//! report channel; everything else resolves right here.

use crate::config::{RESET_DELAY_MS, SERIAL_BAUD};
use crate::hid::HidReport;
use crate::proto::{dispatch, Action, Command, FrameDecoder, FrameEvent, INFO_VERSION};
use defmt::{info, warn};
use embassy_nrf::uarte::{self, Uarte, UarteRx, UarteTx};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Sender;
use embassy_time::Timer;

bind_interrupts!(struct Irqs {
    UARTE0_UART0 => embassy_nrf::uarte::InterruptHandler<peripherals::UARTE0>;
});

/// Initialise the UARTE at the fixed command-link baud rate and split
/// it into its TX and RX halves.
pub fn init(
    uarte: peripherals::UARTE0,
    rxd: peripherals::P0_08,
    txd: peripherals::P0_06,
) -> (
    UarteTx<'static, peripherals::UARTE0>,
    UarteRx<'static, peripherals::UARTE0>,
) {
    let mut config = uarte::Config::default();
    config.baudrate = baudrate();
    let uarte = Uarte::new(uarte, Irqs, rxd, txd, config);
    uarte.split()
}

fn baudrate() -> uarte::Baudrate {
    // The command link is fixed at 57600 baud.
    const _: () = assert!(SERIAL_BAUD == 57_600);
    uarte::Baudrate::BAUD57600
}

/// Run the ingestion loop. Never returns; a reset command restarts the
/// whole device from here.
pub async fn run(
    mut rx: UarteRx<'static, peripherals::UARTE0>,
    mut tx: UarteTx<'static, peripherals::UARTE0>,
    report_tx: Sender<'static, CriticalSectionRawMutex, HidReport, 16>,
) -> ! {
    info!("serial ingestion task started ({} baud)", SERIAL_BAUD);

    let mut decoder = FrameDecoder::new();
    let mut byte = [0u8; 1];

    loop {
        if rx.read(&mut byte).await.is_err() {
            warn!("UART read error");
            continue;
        }

        let (command, action) = match decoder.feed(byte[0]) {
            FrameEvent::NeedMore | FrameEvent::Discard => continue,
            FrameEvent::Accept { command, payload } => {
                // Unknown opcodes discard the frame; payload-contract
                // violations consume it silently.
                let Some(command) = Command::from_opcode(command) else {
                    continue;
                };
                match dispatch(command, payload) {
                    Some(action) => (command, action),
                    None => continue,
                }
            }
        };

        match action {
            Action::Report(report) => report_tx.send(report).await,
            Action::Info => {
                if tx.write(&INFO_VERSION).await.is_err() {
                    warn!("UART write error on {} reply", command);
                }
            }
            Action::Reset => {
                info!("reset command accepted - restarting");
                Timer::after_millis(RESET_DELAY_MS).await;
                cortex_m::peripheral::SCB::sys_reset();
            }
        }
    }
}
