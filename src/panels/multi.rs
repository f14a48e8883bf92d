use crate::config::PanelConfig;
use crate::error::{PanelError, TransportError};
use crate::panel::{PanelCore, PanelLayout, PanelStatus};
use crate::panels::{DisplayTarget, LedTarget, SwitchSource};
use crate::segment::{SegmentStyle, BLANK};
use crate::switches::{SwitchMask, SwitchStream};
use crate::transport::{RusbTransport, Transport};
use crate::{DisplayId, PanelId, SwitchId};

// Mode selector
pub const ALT: SwitchId = SwitchId(0);
pub const VS: SwitchId = SwitchId(1);
pub const IAS: SwitchId = SwitchId(2);
pub const HDG: SwitchId = SwitchId(3);
pub const CRS: SwitchId = SwitchId(4);
pub const ENC_CW: SwitchId = SwitchId(5);
pub const ENC_CCW: SwitchId = SwitchId(6);
pub const BTN_AP: SwitchId = SwitchId(7);
pub const BTN_HDG: SwitchId = SwitchId(8);
pub const BTN_NAV: SwitchId = SwitchId(9);
pub const BTN_IAS: SwitchId = SwitchId(10);
pub const BTN_ALT: SwitchId = SwitchId(11);
pub const BTN_VS: SwitchId = SwitchId(12);
pub const BTN_APR: SwitchId = SwitchId(13);
pub const BTN_REV: SwitchId = SwitchId(14);
pub const AUTO_THROTTLE: SwitchId = SwitchId(15);
pub const FLAPS_UP: SwitchId = SwitchId(16);
pub const FLAPS_DOWN: SwitchId = SwitchId(17);
pub const TRIM_DOWN: SwitchId = SwitchId(18);
pub const TRIM_UP: SwitchId = SwitchId(19);

pub const ROW_1: DisplayId = DisplayId(0);
pub const ROW_2: DisplayId = DisplayId(1);

pub const LED_AP: u8 = 1 << 0;
pub const LED_HDG: u8 = 1 << 1;
pub const LED_NAV: u8 = 1 << 2;
pub const LED_IAS: u8 = 1 << 3;
pub const LED_ALT: u8 = 1 << 4;
pub const LED_VS: u8 = 1 << 5;
pub const LED_APR: u8 = 1 << 6;
pub const LED_REV: u8 = 1 << 7;

pub const MINUS: u8 = 0xde;

/// Selector positions, the encoder and the trim wheel only matter when
/// they become active.
fn suppress_release(id: SwitchId) -> bool {
    (ALT..=ENC_CCW).contains(&id) || id == TRIM_DOWN || id == TRIM_UP
}

pub const LAYOUT: PanelLayout = PanelLayout {
    id: PanelId::Multi,
    displays: 2,
    led_index: Some(10),
    buffer_len: 11,
    initial_byte: BLANK,
    style: SegmentStyle {
        minus: MINUS,
        decimal_point: true,
    },
    suppress_release,
};

/// The multi (autopilot) panel: two 5 digit rows and eight button LEDs.
pub struct MultiPanel<T: Transport = RusbTransport> {
    core: PanelCore<T>,
}

impl MultiPanel {
    pub fn open() -> Result<Self, PanelError> {
        Self::open_with_config(&PanelConfig::default())
    }

    pub fn open_with_config(config: &PanelConfig) -> Result<Self, PanelError> {
        let transport = RusbTransport::new(config).map_err(|source| PanelError::DeviceOpen {
            panel: PanelId::Multi,
            source,
        })?;
        Self::open_with(transport, config)
    }
}

impl<T: Transport> MultiPanel<T> {
    pub fn open_with(transport: T, config: &PanelConfig) -> Result<Self, PanelError> {
        Ok(MultiPanel {
            core: PanelCore::open(LAYOUT, transport, config)?,
        })
    }

    pub fn display_bytes(&self) -> Vec<u8> {
        self.core.display_bytes()
    }

    pub fn last_write_error(&self) -> Option<TransportError> {
        self.core.last_write_error()
    }
}

impl<T: Transport> SwitchSource for MultiPanel<T> {
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

impl<T: Transport> DisplayTarget for MultiPanel<T> {
    fn display_float(&self, display: DisplayId, value: f64, decimals: u32) -> Result<(), PanelError> {
        self.core.display_number(display, value, decimals)
    }

    fn display_string(&self, display: DisplayId, text: &str) -> Result<(), PanelError> {
        self.core.display_string(display, text)
    }

    fn display_off(&self) -> Result<(), PanelError> {
        self.core.display_off()
    }
}

impl<T: Transport> LedTarget for MultiPanel<T> {
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
