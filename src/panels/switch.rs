use crate::config::PanelConfig;
use crate::error::{PanelError, TransportError};
use crate::panel::{PanelCore, PanelLayout, PanelStatus};
use crate::panels::{LedTarget, SwitchSource};
use crate::segment::SegmentStyle;
use crate::switches::{SwitchMask, SwitchStream};
use crate::transport::{RusbTransport, Transport};
use crate::{PanelId, SwitchId};

pub const BAT: SwitchId = SwitchId(0);
pub const ALTERNATOR: SwitchId = SwitchId(1);
pub const AVIONICS: SwitchId = SwitchId(2);
pub const FUEL: SwitchId = SwitchId(3);
pub const DEICE: SwitchId = SwitchId(4);
pub const PITOT: SwitchId = SwitchId(5);
pub const COWL: SwitchId = SwitchId(6);
pub const PANEL: SwitchId = SwitchId(7);
pub const BEACON: SwitchId = SwitchId(8);
pub const NAV: SwitchId = SwitchId(9);
pub const STROBE: SwitchId = SwitchId(10);
pub const TAXI: SwitchId = SwitchId(11);
pub const LANDING: SwitchId = SwitchId(12);
// Magneto/starter rotary
pub const ENG_OFF: SwitchId = SwitchId(13);
pub const ALT_R: SwitchId = SwitchId(14);
pub const ALT_L: SwitchId = SwitchId(15);
pub const ALT_BOTH: SwitchId = SwitchId(16);
pub const ENG_START: SwitchId = SwitchId(17);
pub const GEAR_UP: SwitchId = SwitchId(18);
pub const GEAR_DOWN: SwitchId = SwitchId(19);

// Gear indicator LEDs: nose, left, right. Green and red together show yellow.
pub const N_GREEN: u8 = 1 << 0;
pub const L_GREEN: u8 = 1 << 1;
pub const R_GREEN: u8 = 1 << 2;
pub const N_RED: u8 = 1 << 3;
pub const L_RED: u8 = 1 << 4;
pub const R_RED: u8 = 1 << 5;
pub const N_YELLOW: u8 = N_GREEN | N_RED;
pub const L_YELLOW: u8 = L_GREEN | L_RED;
pub const R_YELLOW: u8 = R_GREEN | R_RED;
pub const ALL_GREEN: u8 = N_GREEN | L_GREEN | R_GREEN;
pub const ALL_RED: u8 = N_RED | L_RED | R_RED;
pub const ALL_YELLOW: u8 = ALL_GREEN | ALL_RED;

/// The engine rotary and the gear lever are positions, not buttons.
fn suppress_release(id: SwitchId) -> bool {
    (ENG_OFF..=ENG_START).contains(&id) || id == GEAR_UP || id == GEAR_DOWN
}

pub const LAYOUT: PanelLayout = PanelLayout {
    id: PanelId::Switch,
    displays: 0,
    led_index: Some(0),
    buffer_len: 1,
    initial_byte: 0,
    style: SegmentStyle {
        minus: 0,
        decimal_point: false,
    },
    suppress_release,
};

/// The switch panel: thirteen toggles, the engine rotary, the gear lever
/// and three bi-colour gear LEDs. It has no segment displays.
pub struct SwitchPanel<T: Transport = RusbTransport> {
    core: PanelCore<T>,
}

impl SwitchPanel {
    pub fn open() -> Result<Self, PanelError> {
        Self::open_with_config(&PanelConfig::default())
    }

    pub fn open_with_config(config: &PanelConfig) -> Result<Self, PanelError> {
        let transport = RusbTransport::new(config).map_err(|source| PanelError::DeviceOpen {
            panel: PanelId::Switch,
            source,
        })?;
        Self::open_with(transport, config)
    }
}

impl<T: Transport> SwitchPanel<T> {
    pub fn open_with(transport: T, config: &PanelConfig) -> Result<Self, PanelError> {
        Ok(SwitchPanel {
            core: PanelCore::open(LAYOUT, transport, config)?,
        })
    }

    /// The current LED bits.
    pub fn leds(&self) -> u8 {
        self.core.display_bytes()[0]
    }

    pub fn last_write_error(&self) -> Option<TransportError> {
        self.core.last_write_error()
    }
}

impl<T: Transport> SwitchSource for SwitchPanel<T> {
    fn id(&self) -> PanelId {
        self.core.id()
    }

    fn watch_switches(&self) -> SwitchStream {
        self.core.watch_switches()
    }

    fn switches(&self) -> SwitchMask {
        self.core.switches()
    }

    fn status(&self) -> PanelStatus {
        self.core.status()
    }

    fn check(&self) -> Result<(), PanelError> {
        self.core.check()
    }

    fn close(&self) {
        self.core.close()
    }
}

impl<T: Transport> LedTarget for SwitchPanel<T> {
    fn set_leds(&self, leds: u8) -> Result<(), PanelError> {
        self.core.update_leds(|_| leds)
    }

    fn leds_on(&self, leds: u8) -> Result<(), PanelError> {
        self.core.update_leds(|current| current | leds)
    }

    fn leds_off(&self, leds: u8) -> Result<(), PanelError> {
        self.core.update_leds(|current| current & !leds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_drop_releases() {
        for id in [ENG_OFF, ALT_R, ALT_L, ALT_BOTH, ENG_START, GEAR_UP, GEAR_DOWN] {
            assert!(suppress_release(id), "{:?}", id);
        }
        for id in [BAT, ALTERNATOR, LANDING] {
            assert!(!suppress_release(id), "{:?}", id);
        }
    }

    #[test]
    fn yellow_is_green_and_red() {
        assert_eq!(ALL_YELLOW, 0x3f);
        assert_eq!(N_YELLOW & N_RED, N_RED);
    }
}
