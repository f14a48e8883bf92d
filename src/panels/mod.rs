//! Design: every panel wraps a [`PanelCore`](crate::panel::PanelCore) with
//! its own layout and exposes the capabilities it has through the traits
//! below.
//!
//! A panel with switches is a [`SwitchSource`]; panels with segment
//! displays are [`DisplayTarget`]s and panels with LEDs [`LedTarget`]s.
pub mod multi;
pub mod radio;
pub mod switch;

pub use multi::MultiPanel;
pub use radio::RadioPanel;
pub use switch::SwitchPanel;

use crate::error::PanelError;
use crate::panel::PanelStatus;
use crate::switches::{SwitchMask, SwitchStream};
use crate::{DisplayId, PanelId, SwitchId};

pub trait SwitchSource {
    fn id(&self) -> PanelId;

    /// A handle on the switch events. Events are generated from the moment
    /// the panel is opened, so transitions made before this call are queued.
    fn watch_switches(&self) -> SwitchStream;

    fn switches(&self) -> SwitchMask;

    fn is_switch_set(&self, id: SwitchId) -> bool {
        self.switches().is_set(id)
    }

    fn status(&self) -> PanelStatus;

    /// Turns the panel's condition into an error: closed, disconnected, or
    /// failing to accept output reports.
    fn check(&self) -> Result<(), PanelError>;

    fn close(&self);
}

pub trait DisplayTarget {
    fn display_int(&self, display: DisplayId, value: i64) -> Result<(), PanelError> {
        self.display_float(display, value as f64, 0)
    }

    /// Shows `value` with `decimals` digits after the point.
    fn display_float(&self, display: DisplayId, value: f64, decimals: u32) -> Result<(), PanelError>;

    /// Shows digits, spaces, `-` and `.`; positions with any other
    /// character keep what they show.
    fn display_string(&self, display: DisplayId, text: &str) -> Result<(), PanelError>;

    /// Blanks every display.
    fn display_off(&self) -> Result<(), PanelError>;
}

pub trait LedTarget {
    /// Sets the LEDs to exactly `leds`.
    fn set_leds(&self, leds: u8) -> Result<(), PanelError>;

    fn leds_on(&self, leds: u8) -> Result<(), PanelError>;

    fn leds_off(&self, leds: u8) -> Result<(), PanelError>;

    /// Turns `leds` on when `value` is non-zero and off otherwise.
    fn leds_on_off(&self, leds: u8, value: f64) -> Result<(), PanelError> {
        if value != 0.0 {
            self.leds_on(leds)
        } else {
            self.leds_off(leds)
        }
    }
}
