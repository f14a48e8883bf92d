use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use log::debug;
use rusb::{Context, DeviceHandle, Direction, TransferType, UsbContext};

use super::{Transport, UsbDevice};
use crate::config::PanelConfig;
use crate::error::TransportError;

const DEFAULT_CONFIGURATION: u8 = 1;
const DEFAULT_INTERFACE: u8 = 0;

/// libusb backed transport. Each panel gets its own context.
pub struct RusbTransport {
    context: Context,
    read_timeout: Duration,
    write_timeout: Duration,
}

impl RusbTransport {
    pub fn new(config: &PanelConfig) -> Result<Self, TransportError> {
        Ok(RusbTransport {
            context: Context::new()?,
            read_timeout: config.read_timeout(),
            write_timeout: config.write_timeout(),
        })
    }
}

impl Transport for RusbTransport {
    type Device = RusbDevice;

    fn open(&mut self, vendor_id: u16, product_id: u16) -> Result<RusbDevice, TransportError> {
        let device = self
            .context
            .devices()?
            .iter()
            .find(|d| {
                d.device_descriptor().map_or(false, |desc| {
                    desc.vendor_id() == vendor_id && desc.product_id() == product_id
                })
            })
            .ok_or(TransportError::NotFound {
                vendor_id,
                product_id,
            })?;

        let handle = device.open()?;
        debug!(
            "opened {:04x}:{:04x} on bus {} address {}",
            vendor_id,
            product_id,
            device.bus_number(),
            device.address()
        );

        Ok(RusbDevice {
            handle,
            cancelled: AtomicBool::new(false),
            read_timeout: self.read_timeout,
            write_timeout: self.write_timeout,
        })
    }
}

pub struct RusbDevice {
    handle: DeviceHandle<Context>,
    cancelled: AtomicBool,
    read_timeout: Duration,
    write_timeout: Duration,
}

impl UsbDevice for RusbDevice {
    fn claim_default_interface(&mut self) -> Result<u8, TransportError> {
        match self.handle.set_auto_detach_kernel_driver(true) {
            Ok(()) | Err(rusb::Error::NotSupported) => {}
            Err(err) => return Err(err.into()),
        }
        if self.handle.active_configuration()? != DEFAULT_CONFIGURATION {
            self.handle.set_active_configuration(DEFAULT_CONFIGURATION)?;
        }
        self.handle.claim_interface(DEFAULT_INTERFACE)?;
        Ok(DEFAULT_INTERFACE)
    }

    fn release_interface(&mut self, interface: u8) -> Result<(), TransportError> {
        Ok(self.handle.release_interface(interface)?)
    }

    fn resolve_in_endpoint(&self, interface: u8, number: u8) -> Result<u8, TransportError> {
        let config = self.handle.device().active_config_descriptor()?;
        for iface in config.interfaces().filter(|i| i.number() == interface) {
            for desc in iface.descriptors().filter(|d| d.setting_number() == 0) {
                for ep in desc.endpoint_descriptors() {
                    if ep.number() == number
                        && ep.direction() == Direction::In
                        && ep.transfer_type() == TransferType::Interrupt
                    {
                        return Ok(ep.address());
                    }
                }
            }
        }
        Err(TransportError::EndpointNotFound(number))
    }

    fn read_interrupt(&self, endpoint: u8, buf: &mut [u8]) -> Result<usize, TransportError> {
        // libusb offers no way to abort a synchronous transfer, so poll with a
        // short timeout and check the cancel flag in between.
        loop {
            if self.cancelled.load(Ordering::Acquire) {
                return Err(TransportError::Cancelled);
            }
            match self.handle.read_interrupt(endpoint, buf, self.read_timeout) {
                Ok(n) => return Ok(n),
                Err(rusb::Error::Timeout) => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn write_control(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        payload: &[u8],
    ) -> Result<usize, TransportError> {
        let n = self.handle.write_control(
            request_type,
            request,
            value,
            index,
            payload,
            self.write_timeout,
        )?;
        if n != payload.len() {
            return Err(TransportError::ShortTransfer {
                expected: payload.len(),
                actual: n,
            });
        }
        Ok(n)
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}
