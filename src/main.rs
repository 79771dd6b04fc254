//! Embedded entry point - nRF52840 serial-to-USB HID bridge.
//!
//! Spawns three tasks:
//! - USB device stack (enumeration + endpoint servicing)
//! - HID writer (report channel → interrupt-IN endpoint)
//! - serial ingestion (UARTE bytes → frames → dispatch)

#![no_std]
#![no_main]

use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_nrf::peripherals;
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_usb::class::hid::HidWriter;
use embassy_usb::UsbDevice;
use panic_probe as _;

use serial2usb::hid::HidReport;
use serial2usb::{serial, usb};

/// Encoded reports travel from the serial task to the USB writer here.
static REPORT_CHANNEL: Channel<CriticalSectionRawMutex, HidReport, 16> = Channel::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("serial2usb starting");

    let usb_dev = usb::hid_device::init(p.USBD);
    let (uart_tx, uart_rx) = serial::init(p.UARTE0, p.P0_08, p.P0_06);

    spawner.must_spawn(usb_device_task(usb_dev.device));
    spawner.must_spawn(hid_writer_task(
        usb_dev.hid_writer,
        REPORT_CHANNEL.receiver(),
    ));
    spawner.must_spawn(serial_bridge_task(
        uart_rx,
        uart_tx,
        REPORT_CHANNEL.sender(),
    ));
}

#[embassy_executor::task]
async fn usb_device_task(
    device: UsbDevice<'static, Driver<'static, peripherals::USBD, HardwareVbusDetect>>,
) -> ! {
    usb::hid_device::run_usb_device(device).await
}

#[embassy_executor::task]
async fn hid_writer_task(
    writer: HidWriter<'static, Driver<'static, peripherals::USBD, HardwareVbusDetect>, 16>,
    report_rx: Receiver<'static, CriticalSectionRawMutex, HidReport, 16>,
) -> ! {
    usb::hid_device::hid_writer_task(writer, &report_rx).await
}

#[embassy_executor::task]
async fn serial_bridge_task(
    uart_rx: embassy_nrf::uarte::UarteRx<'static, peripherals::UARTE0>,
    uart_tx: embassy_nrf::uarte::UarteTx<'static, peripherals::UARTE0>,
    report_tx: Sender<'static, CriticalSectionRawMutex, HidReport, 16>,
) -> ! {
    serial::run(uart_rx, uart_tx, report_tx).await
}
