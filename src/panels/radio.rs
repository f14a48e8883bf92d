use crate::config::PanelConfig;
use crate::error::{PanelError, TransportError};
use crate::panel::{PanelCore, PanelLayout, PanelStatus};
use crate::panels::{DisplayTarget, SwitchSource};
use crate::segment::{SegmentStyle, BLANK};
use crate::switches::{SwitchMask, SwitchStream};
use crate::transport::{RusbTransport, Transport};
use crate::{DisplayId, PanelId, SwitchId};

// Mode selector, upper half
pub const COM1_1: SwitchId = SwitchId(0);
pub const COM2_1: SwitchId = SwitchId(1);
pub const NAV1_1: SwitchId = SwitchId(2);
pub const NAV2_1: SwitchId = SwitchId(3);
pub const ADF_1: SwitchId = SwitchId(4);
pub const DME_1: SwitchId = SwitchId(5);
pub const XPDR_1: SwitchId = SwitchId(6);
// Mode selector, lower half
pub const COM1_2: SwitchId = SwitchId(7);
pub const COM2_2: SwitchId = SwitchId(8);
pub const NAV1_2: SwitchId = SwitchId(9);
pub const NAV2_2: SwitchId = SwitchId(10);
pub const ADF_2: SwitchId = SwitchId(11);
pub const DME_2: SwitchId = SwitchId(12);
pub const XPDR_2: SwitchId = SwitchId(13);
/// Active/standby swap buttons.
pub const ACT_1: SwitchId = SwitchId(14);
pub const ACT_2: SwitchId = SwitchId(15);
// Encoders: 1 is the inner knob, 2 the outer.
pub const ENC1_CW_1: SwitchId = SwitchId(16);
pub const ENC1_CCW_1: SwitchId = SwitchId(17);
pub const ENC2_CW_1: SwitchId = SwitchId(18);
pub const ENC2_CCW_1: SwitchId = SwitchId(19);
pub const ENC1_CW_2: SwitchId = SwitchId(20);
pub const ENC1_CCW_2: SwitchId = SwitchId(21);
pub const ENC2_CW_2: SwitchId = SwitchId(22);
pub const ENC2_CCW_2: SwitchId = SwitchId(23);

pub const ACTIVE_1: DisplayId = DisplayId(0);
pub const STANDBY_1: DisplayId = DisplayId(1);
pub const ACTIVE_2: DisplayId = DisplayId(2);
pub const STANDBY_2: DisplayId = DisplayId(3);

pub const MINUS: u8 = 0xef;

/// Only the swap buttons report their release.
fn suppress_release(id: SwitchId) -> bool {
    id != ACT_1 && id != ACT_2
}

pub const LAYOUT: PanelLayout = PanelLayout {
    id: PanelId::Radio,
    displays: 4,
    led_index: None,
    buffer_len: 20,
    initial_byte: BLANK,
    style: SegmentStyle {
        minus: MINUS,
        decimal_point: true,
    },
    suppress_release,
};

/// The radio panel: four 5 digit displays, two mode selectors, two dual
/// encoders and two swap buttons.
pub struct RadioPanel<T: Transport = RusbTransport> {
    core: PanelCore<T>,
}

impl RadioPanel {
    pub fn open() -> Result<Self, PanelError> {
        Self::open_with_config(&PanelConfig::default())
    }

    pub fn open_with_config(config: &PanelConfig) -> Result<Self, PanelError> {
        let transport = RusbTransport::new(config).map_err(|source| PanelError::DeviceOpen {
            panel: PanelId::Radio,
            source,
        })?;
        Self::open_with(transport, config)
    }
}

impl<T: Transport> RadioPanel<T> {
    pub fn open_with(transport: T, config: &PanelConfig) -> Result<Self, PanelError> {
        Ok(RadioPanel {
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

impl<T: Transport> SwitchSource for RadioPanel<T> {
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

impl<T: Transport> DisplayTarget for RadioPanel<T> {
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
