//! What every panel type shares: opening the device, the writer and reader
//! threads, and closing it all down again.
use std::ops::Range;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use async_channel::Receiver;
use log::{debug, error, info, warn};

use crate::config::PanelConfig;
use crate::display::{run_writer, DisplayBuffer};
use crate::error::{PanelError, TransportError, ValidationError};
use crate::segment::{self, SegmentStyle, DIGITS};
use crate::switches::{run_reader, InputState, SwitchMask, SwitchStream};
use crate::transport::{
    Transport, UsbDevice, HID_REPORT_VALUE, HID_SET_REPORT, INPUT_ENDPOINT,
    REQUEST_TYPE_CLASS_INTERFACE_OUT,
};
use crate::{DisplayId, PanelEvent, PanelId, SwitchId, USB_VENDOR_PANEL};

/// Geometry and policies of one panel type.
#[derive(Clone, Copy, Debug)]
pub struct PanelLayout {
    pub id: PanelId,
    /// Number of 5 digit displays at the start of the buffer.
    pub displays: u8,
    /// Index of the LED byte, if the panel has LEDs.
    pub led_index: Option<usize>,
    pub buffer_len: usize,
    /// Byte every position starts with.
    pub initial_byte: u8,
    pub style: SegmentStyle,
    /// Switches whose release is not worth reporting.
    pub suppress_release: fn(SwitchId) -> bool,
}

impl PanelLayout {
    fn display_len(&self) -> usize {
        self.displays as usize * DIGITS
    }

    fn initial_buffer(&self) -> Vec<u8> {
        let mut bytes = vec![self.initial_byte; self.buffer_len];
        if let Some(index) = self.led_index {
            bytes[index] = 0;
        }
        bytes
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PanelStatus {
    Ready,
    /// The input endpoint failed; no more switch events will arrive.
    Disconnected(TransportError),
    Closed,
}

/// Everything acquired while opening, released in reverse order.
struct Resources<T: Transport> {
    panel: PanelId,
    transport: Option<T>,
    device: Option<Arc<T::Device>>,
    interface: Option<u8>,
    display: Arc<DisplayBuffer>,
    writer: Option<JoinHandle<()>>,
    reader: Option<JoinHandle<()>>,
}

impl<T: Transport> Resources<T> {
    fn release(&mut self) {
        if let Some(device) = &self.device {
            device.cancel();
        }
        self.display.close();
        for worker in [self.writer.take(), self.reader.take()].into_iter().flatten() {
            if worker.join().is_err() {
                error!("{} panel worker panicked", self.panel);
            }
        }

        if let Some(interface) = self.interface.take() {
            match self.device.as_mut().and_then(Arc::get_mut) {
                Some(device) => match device.release_interface(interface) {
                    Ok(()) => debug!("{} panel released interface {}", self.panel, interface),
                    Err(err) => warn!(
                        "unable to release interface {} of {} panel: {}",
                        interface, self.panel, err
                    ),
                },
                None => warn!("{} panel device still in use, interface not released", self.panel),
            }
        }
        if self.device.take().is_some() {
            debug!("{} panel device closed", self.panel);
        }
        if self.transport.take().is_some() {
            debug!("{} panel transport closed", self.panel);
        }
    }
}

impl<T: Transport> Drop for Resources<T> {
    fn drop(&mut self) {
        self.release();
    }
}

/// The engines behind every panel type.
pub struct PanelCore<T: Transport> {
    layout: PanelLayout,
    display: Arc<DisplayBuffer>,
    input: Arc<InputState>,
    events: Receiver<PanelEvent>,
    resources: Mutex<Option<Resources<T>>>,
}

impl<T: Transport> PanelCore<T> {
    /// Opens the device, claims its interface, resolves the input endpoint
    /// and starts the writer and reader. On failure everything acquired so
    /// far is released before the error is returned.
    pub fn open(layout: PanelLayout, transport: T, config: &PanelConfig) -> Result<Self, PanelError> {
        let panel = layout.id;
        debug!("opening {} panel", panel);
        let display = Arc::new(DisplayBuffer::new(
            panel,
            layout.initial_buffer(),
            layout.display_len(),
        ));
        let mut transport = transport;
        let opened = transport.open(USB_VENDOR_PANEL, panel.product_id());
        let mut resources = Resources {
            panel,
            transport: Some(transport),
            device: None,
            interface: None,
            display: display.clone(),
            writer: None,
            reader: None,
        };

        let mut device = opened.map_err(|source| PanelError::DeviceOpen { panel, source })?;
        let claimed = device.claim_default_interface();
        let device = Arc::new(device);
        resources.device = Some(device.clone());
        let interface = claimed.map_err(|source| PanelError::ResourceAcquisition {
            panel,
            resource: "interface",
            source,
        })?;
        resources.interface = Some(interface);

        let endpoint = device
            .resolve_in_endpoint(interface, INPUT_ENDPOINT)
            .map_err(|source| PanelError::ResourceAcquisition {
                panel,
                resource: "input endpoint",
                source,
            })?;

        let writer_device = device.clone();
        let writer_display = display.clone();
        let interval = config.refresh_interval();
        resources.writer = Some(
            thread::Builder::new()
                .name(format!("fpanels-{}-writer", panel))
                .spawn(move || {
                    run_writer(&writer_display, interval, |frame| {
                        writer_device
                            .write_control(
                                REQUEST_TYPE_CLASS_INTERFACE_OUT,
                                HID_SET_REPORT,
                                HID_REPORT_VALUE,
                                interface as u16,
                                frame,
                            )
                            .map(|_| ())
                    })
                })
                .map_err(|source| PanelError::ThreadSpawn { panel, source })?,
        );

        let input = Arc::new(InputState::default());
        let (tx, rx) = async_channel::bounded(config.event_capacity.max(1));
        let reader_input = input.clone();
        let suppress = config.suppress_releases;
        let policy = layout.suppress_release;
        resources.reader = Some(
            thread::Builder::new()
                .name(format!("fpanels-{}-reader", panel))
                .spawn(move || {
                    run_reader(
                        panel,
                        &reader_input,
                        &tx,
                        |id| suppress && policy(id),
                        |buf| device.read_interrupt(endpoint, buf),
                    )
                })
                .map_err(|source| PanelError::ThreadSpawn { panel, source })?,
        );

        info!("{} panel ready", panel);
        Ok(PanelCore {
            layout,
            display,
            input,
            events: rx,
            resources: Mutex::new(Some(resources)),
        })
    }

    pub fn id(&self) -> PanelId {
        self.layout.id
    }

    pub fn layout(&self) -> &PanelLayout {
        &self.layout
    }

    /// Stops both workers and releases interface, device and transport, in
    /// that order. Calling it again does nothing.
    pub fn close(&self) {
        let resources = self.lock_resources().take();
        if let Some(mut resources) = resources {
            resources.release();
            info!("{} panel closed", self.layout.id);
        }
    }

    pub fn status(&self) -> PanelStatus {
        if self.lock_resources().is_none() {
            return PanelStatus::Closed;
        }
        match self.input.failure() {
            Some(err) => PanelStatus::Disconnected(err),
            None => PanelStatus::Ready,
        }
    }

    pub fn last_write_error(&self) -> Option<TransportError> {
        self.display.last_write_error()
    }

    /// `Ok` while the panel is open, reading and the last output report
    /// went through.
    pub fn check(&self) -> Result<(), PanelError> {
        let panel = self.layout.id;
        match self.status() {
            PanelStatus::Closed => Err(PanelError::Closed(panel)),
            PanelStatus::Disconnected(source) => Err(PanelError::Disconnected { panel, source }),
            PanelStatus::Ready => match self.last_write_error() {
                Some(source) => Err(PanelError::TransportWrite { panel, source }),
                None => Ok(()),
            },
        }
    }

    /// Current contents of the output buffer.
    pub fn display_bytes(&self) -> Vec<u8> {
        self.display.snapshot()
    }

    pub fn display_number(
        &self,
        display: DisplayId,
        value: f64,
        decimals: u32,
    ) -> Result<(), PanelError> {
        let range = self.display_region(display)?;
        let bytes = segment::encode_number(value, decimals, self.layout.style)?;
        self.ensure_open()?;
        Ok(self.display.set_region(range, &bytes)?)
    }

    pub fn display_string(&self, display: DisplayId, text: &str) -> Result<(), PanelError> {
        let range = self.display_region(display)?;
        let text = segment::encode_string(text, self.layout.style);
        self.ensure_open()?;
        Ok(self.display.update_region(range, |region| text.apply(region))?)
    }

    pub fn display_off(&self) -> Result<(), PanelError> {
        self.ensure_open()?;
        self.display.turn_off();
        Ok(())
    }

    /// Replaces the LED byte with `f(current)`.
    pub fn update_leds(&self, f: impl FnOnce(u8) -> u8) -> Result<(), PanelError> {
        let len = self.layout.buffer_len;
        let index = self.layout.led_index.ok_or(ValidationError::InvalidRegion {
            start: len,
            end: len + 1,
            len,
        })?;
        self.ensure_open()?;
        Ok(self
            .display
            .update_region(index..index + 1, |led| led[0] = f(led[0]))?)
    }

    /// A handle on the panel's switch events. All handles share one queue.
    pub fn watch_switches(&self) -> SwitchStream {
        SwitchStream::new(self.layout.id, self.events.clone())
    }

    pub fn switches(&self) -> SwitchMask {
        self.input.mask()
    }

    pub fn is_switch_set(&self, id: SwitchId) -> bool {
        self.switches().is_set(id)
    }

    fn display_region(&self, display: DisplayId) -> Result<Range<usize>, ValidationError> {
        if display.0 >= self.layout.displays {
            return Err(ValidationError::InvalidDisplaySlot {
                panel: self.layout.id,
                display,
            });
        }
        let start = display.0 as usize * DIGITS;
        Ok(start..start + DIGITS)
    }

    fn ensure_open(&self) -> Result<(), PanelError> {
        if self.display.is_closed() {
            return Err(PanelError::Closed(self.layout.id));
        }
        Ok(())
    }

    fn lock_resources(&self) -> MutexGuard<'_, Option<Resources<T>>> {
        self.resources.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Transport> Drop for PanelCore<T> {
    fn drop(&mut self) {
        self.close();
    }
}
