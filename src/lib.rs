//! Drivers for the Saitek/Logitech flight panels: the radio panel, the
//! multi panel and the switch panel.
//!
//! Open a panel with one of the constructors in [`panels`], mutate its
//! displays and LEDs, and consume switch transitions from
//! [`SwitchStream`]. Output is flushed by a background writer and input is
//! decoded by a background reader, both owned by the panel and stopped by
//! `close()` (or on drop).
pub mod config;
pub mod display;
pub mod error;
pub mod names;
pub mod panel;
pub mod panels;
pub mod segment;
pub mod switches;
pub mod transport;

use std::fmt;

pub use config::PanelConfig;
pub use error::{LookupError, PanelError, TransportError, ValidationError};
pub use panel::PanelStatus;
pub use panels::{DisplayTarget, LedTarget, MultiPanel, RadioPanel, SwitchPanel, SwitchSource};
pub use switches::{SwitchMask, SwitchStream};

/// USB vendor id shared by every panel.
pub const USB_VENDOR_PANEL: u16 = 0x06a3;
pub const USB_PRODUCT_RADIO: u16 = 0x0d05;
pub const USB_PRODUCT_MULTI: u16 = 0x0d06;
pub const USB_PRODUCT_SWITCH: u16 = 0x0d67;

/// Identifies the type of a panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PanelId {
    Radio,
    Multi,
    Switch,
}

impl PanelId {
    pub fn product_id(self) -> u16 {
        match self {
            PanelId::Radio => USB_PRODUCT_RADIO,
            PanelId::Multi => USB_PRODUCT_MULTI,
            PanelId::Switch => USB_PRODUCT_SWITCH,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PanelId::Radio => "radio",
            PanelId::Multi => "multi",
            PanelId::Switch => "switch",
        }
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A switch, button or encoder direction on a panel. Numbering is local to
/// each panel type: `SwitchId(0)` is `COM1_1` on the radio panel and `BAT`
/// on the switch panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SwitchId(pub u8);

impl fmt::Display for SwitchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A segment display on a panel, numbered from the left/top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DisplayId(pub u8);

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One observed transition of a single switch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwitchEvent {
    pub panel: PanelId,
    pub switch: SwitchId,
    pub on: bool,
}

/// What a panel's event stream delivers.
#[derive(Clone, Debug, PartialEq)]
pub enum PanelEvent {
    Switch(SwitchEvent),
    /// The input endpoint failed. This is the last event of the stream.
    Disconnected { panel: PanelId, error: TransportError },
}
