use thiserror::Error;

use crate::{DisplayId, PanelId};

/// Errors reported by a [`crate::transport::Transport`] or its device.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TransportError {
    #[error("device {vendor_id:04x}:{product_id:04x} not found")]
    NotFound { vendor_id: u16, product_id: u16 },

    #[error("input endpoint {0} not found")]
    EndpointNotFound(u8),

    #[error("transfer cancelled")]
    Cancelled,

    #[error("short transfer: {actual} of {expected} bytes")]
    ShortTransfer { expected: usize, actual: usize },

    #[error("USB error: {0}")]
    Usb(#[from] rusb::Error),
}

/// A bad argument to a display operation. The display buffer is left
/// untouched when one of these is returned.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("decimals {0} out of range 0..=5")]
    DecimalsOutOfRange(u32),

    #[error("value {0} cannot be shown on a 5 digit display")]
    ValueOutOfRange(f64),

    #[error("value is not a finite number")]
    NotFinite,

    #[error("display {display} does not exist on the {panel} panel")]
    InvalidDisplaySlot { panel: PanelId, display: DisplayId },

    #[error("byte range {start}..{end} outside a {len} byte display buffer")]
    InvalidRegion { start: usize, end: usize, len: usize },
}

#[derive(Debug, Error)]
pub enum PanelError {
    /// The panel was never opened.
    #[error("unable to open {panel} panel: {source}")]
    DeviceOpen { panel: PanelId, source: TransportError },

    /// The panel was found but could not be set up. Everything acquired so
    /// far has been released.
    #[error("unable to acquire {resource} of {panel} panel: {source}")]
    ResourceAcquisition {
        panel: PanelId,
        resource: &'static str,
        source: TransportError,
    },

    #[error("unable to start {panel} panel worker: {source}")]
    ThreadSpawn { panel: PanelId, source: std::io::Error },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("writing output report to {panel} panel failed: {source}")]
    TransportWrite { panel: PanelId, source: TransportError },

    /// The panel was opened and later lost its input endpoint.
    #[error("{panel} panel disconnected: {source}")]
    Disconnected { panel: PanelId, source: TransportError },

    #[error("{0} panel is closed")]
    Closed(PanelId),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("unknown panel type {0:?}")]
    UnknownPanel(String),

    #[error("unknown switch {0:?}")]
    UnknownSwitch(String),

    #[error("unknown LED {0:?}")]
    UnknownLed(String),

    #[error("unknown display {0:?}")]
    UnknownDisplay(String),
}
