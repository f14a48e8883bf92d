//! The USB capability the panels are built on.
//!
//! A [`Transport`] opens devices; the returned [`UsbDevice`] is owned by
//! exactly one panel. The panel calls `claim_default_interface` and
//! `resolve_in_endpoint` while opening, shares the device with its writer
//! and reader threads, and finally calls `cancel`, joins the threads and
//! calls `release_interface` before dropping the device and the transport.
mod libusb;

pub use libusb::{RusbDevice, RusbTransport};

use crate::error::TransportError;

/// bmRequestType of a class request to an interface, host to device.
pub const REQUEST_TYPE_CLASS_INTERFACE_OUT: u8 = 0x21;
/// HID SET_REPORT.
pub const HID_SET_REPORT: u8 = 0x09;
/// wValue the panels expect with SET_REPORT.
pub const HID_REPORT_VALUE: u16 = 0x03;

/// Number of the interrupt endpoint carrying input reports.
pub const INPUT_ENDPOINT: u8 = 1;

pub trait Transport: Send + 'static {
    type Device: UsbDevice;

    fn open(&mut self, vendor_id: u16, product_id: u16) -> Result<Self::Device, TransportError>;
}

pub trait UsbDevice: Send + Sync + 'static {
    /// Claims the default interface and returns its number.
    fn claim_default_interface(&mut self) -> Result<u8, TransportError>;

    fn release_interface(&mut self, interface: u8) -> Result<(), TransportError>;

    /// Looks up IN endpoint `number` on `interface` and returns its address.
    fn resolve_in_endpoint(&self, interface: u8, number: u8) -> Result<u8, TransportError>;

    /// Blocks until an input report arrives, the device fails or
    /// [`UsbDevice::cancel`] is called, in which case it returns
    /// [`TransportError::Cancelled`].
    fn read_interrupt(&self, endpoint: u8, buf: &mut [u8]) -> Result<usize, TransportError>;

    fn write_control(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        payload: &[u8],
    ) -> Result<usize, TransportError>;

    /// Unblocks a pending and every later `read_interrupt`.
    fn cancel(&self);
}
