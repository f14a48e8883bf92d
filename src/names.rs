//! Case-insensitive lookup of panels, switches, LEDs and displays by the
//! names printed on the hardware.
use std::str::FromStr;

use crate::error::LookupError;
use crate::panels::{multi, radio, switch};
use crate::{DisplayId, PanelId, SwitchId};

const PANELS: &[(&str, PanelId)] = &[
    ("RADIO", PanelId::Radio),
    ("MULTI", PanelId::Multi),
    ("SWITCH", PanelId::Switch),
];

const SWITCHES: &[(&str, PanelId, SwitchId)] = &[
    ("COM1_1", PanelId::Radio, radio::COM1_1),
    ("COM2_1", PanelId::Radio, radio::COM2_1),
    ("NAV1_1", PanelId::Radio, radio::NAV1_1),
    ("NAV2_1", PanelId::Radio, radio::NAV2_1),
    ("ADF_1", PanelId::Radio, radio::ADF_1),
    ("DME_1", PanelId::Radio, radio::DME_1),
    ("XPDR_1", PanelId::Radio, radio::XPDR_1),
    ("COM1_2", PanelId::Radio, radio::COM1_2),
    ("COM2_2", PanelId::Radio, radio::COM2_2),
    ("NAV1_2", PanelId::Radio, radio::NAV1_2),
    ("NAV2_2", PanelId::Radio, radio::NAV2_2),
    ("ADF_2", PanelId::Radio, radio::ADF_2),
    ("DME_2", PanelId::Radio, radio::DME_2),
    ("XPDR_2", PanelId::Radio, radio::XPDR_2),
    ("ACT_1", PanelId::Radio, radio::ACT_1),
    ("ACT_2", PanelId::Radio, radio::ACT_2),
    ("ENC1_CW_1", PanelId::Radio, radio::ENC1_CW_1),
    ("ENC1_CCW_1", PanelId::Radio, radio::ENC1_CCW_1),
    ("ENC2_CW_1", PanelId::Radio, radio::ENC2_CW_1),
    ("ENC2_CCW_1", PanelId::Radio, radio::ENC2_CCW_1),
    ("ENC1_CW_2", PanelId::Radio, radio::ENC1_CW_2),
    ("ENC1_CCW_2", PanelId::Radio, radio::ENC1_CCW_2),
    ("ENC2_CW_2", PanelId::Radio, radio::ENC2_CW_2),
    ("ENC2_CCW_2", PanelId::Radio, radio::ENC2_CCW_2),
    ("ALT", PanelId::Multi, multi::ALT),
    ("VS", PanelId::Multi, multi::VS),
    ("IAS", PanelId::Multi, multi::IAS),
    ("HDG", PanelId::Multi, multi::HDG),
    ("CRS", PanelId::Multi, multi::CRS),
    ("ENC_CW", PanelId::Multi, multi::ENC_CW),
    ("ENC_CCW", PanelId::Multi, multi::ENC_CCW),
    ("BTN_AP", PanelId::Multi, multi::BTN_AP),
    ("BTN_HDG", PanelId::Multi, multi::BTN_HDG),
    ("BTN_NAV", PanelId::Multi, multi::BTN_NAV),
    ("BTN_IAS", PanelId::Multi, multi::BTN_IAS),
    ("BTN_ALT", PanelId::Multi, multi::BTN_ALT),
    ("BTN_VS", PanelId::Multi, multi::BTN_VS),
    ("BTN_APR", PanelId::Multi, multi::BTN_APR),
    ("BTN_REV", PanelId::Multi, multi::BTN_REV),
    ("AUTO_THROTTLE", PanelId::Multi, multi::AUTO_THROTTLE),
    ("FLAPS_UP", PanelId::Multi, multi::FLAPS_UP),
    ("FLAPS_DOWN", PanelId::Multi, multi::FLAPS_DOWN),
    ("TRIM_DOWN", PanelId::Multi, multi::TRIM_DOWN),
    ("TRIM_UP", PanelId::Multi, multi::TRIM_UP),
    ("BAT", PanelId::Switch, switch::BAT),
    ("ALTERNATOR", PanelId::Switch, switch::ALTERNATOR),
    ("AVIONICS", PanelId::Switch, switch::AVIONICS),
    ("FUEL", PanelId::Switch, switch::FUEL),
    ("DEICE", PanelId::Switch, switch::DEICE),
    ("PITOT", PanelId::Switch, switch::PITOT),
    ("COWL", PanelId::Switch, switch::COWL),
    ("PANEL", PanelId::Switch, switch::PANEL),
    ("BEACON", PanelId::Switch, switch::BEACON),
    ("NAV", PanelId::Switch, switch::NAV),
    ("STROBE", PanelId::Switch, switch::STROBE),
    ("TAXI", PanelId::Switch, switch::TAXI),
    ("LANDING", PanelId::Switch, switch::LANDING),
    ("ENG_OFF", PanelId::Switch, switch::ENG_OFF),
    ("ALT_R", PanelId::Switch, switch::ALT_R),
    ("ALT_L", PanelId::Switch, switch::ALT_L),
    ("ALT_BOTH", PanelId::Switch, switch::ALT_BOTH),
    ("ENG_START", PanelId::Switch, switch::ENG_START),
    ("GEAR_UP", PanelId::Switch, switch::GEAR_UP),
    ("GEAR_DOWN", PanelId::Switch, switch::GEAR_DOWN),
];

const LEDS: &[(&str, u8)] = &[
    ("N_GREEN", switch::N_GREEN),
    ("L_GREEN", switch::L_GREEN),
    ("R_GREEN", switch::R_GREEN),
    ("N_RED", switch::N_RED),
    ("L_RED", switch::L_RED),
    ("R_RED", switch::R_RED),
    ("N_YELLOW", switch::N_YELLOW),
    ("L_YELLOW", switch::L_YELLOW),
    ("R_YELLOW", switch::R_YELLOW),
    ("ALL_GREEN", switch::ALL_GREEN),
    ("ALL_RED", switch::ALL_RED),
    ("ALL_YELLOW", switch::ALL_YELLOW),
    ("LED_AP", multi::LED_AP),
    ("LED_HDG", multi::LED_HDG),
    ("LED_NAV", multi::LED_NAV),
    ("LED_IAS", multi::LED_IAS),
    ("LED_ALT", multi::LED_ALT),
    ("LED_VS", multi::LED_VS),
    ("LED_APR", multi::LED_APR),
    ("LED_REV", multi::LED_REV),
];

const DISPLAYS: &[(&str, PanelId, DisplayId)] = &[
    ("ACTIVE_1", PanelId::Radio, radio::ACTIVE_1),
    ("STANDBY_1", PanelId::Radio, radio::STANDBY_1),
    ("ACTIVE_2", PanelId::Radio, radio::ACTIVE_2),
    ("STANDBY_2", PanelId::Radio, radio::STANDBY_2),
    ("ROW_1", PanelId::Multi, multi::ROW_1),
    ("ROW_2", PanelId::Multi, multi::ROW_2),
];

pub fn panel_id(name: &str) -> Result<PanelId, LookupError> {
    PANELS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, id)| id)
        .ok_or_else(|| LookupError::UnknownPanel(name.to_owned()))
}

/// The switch called `name` and the panel it belongs to.
pub fn switch_id(name: &str) -> Result<(PanelId, SwitchId), LookupError> {
    SWITCHES
        .iter()
        .find(|(n, _, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, panel, id)| (panel, id))
        .ok_or_else(|| LookupError::UnknownSwitch(name.to_owned()))
}

pub fn switch_name(panel: PanelId, id: SwitchId) -> Option<&'static str> {
    SWITCHES
        .iter()
        .find(|&&(_, p, s)| p == panel && s == id)
        .map(|&(n, _, _)| n)
}

/// The LED bits called `name`. Composite names such as `N_YELLOW` cover
/// more than one bit.
pub fn led_bits(name: &str) -> Result<u8, LookupError> {
    LEDS.iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, bits)| bits)
        .ok_or_else(|| LookupError::UnknownLed(name.to_owned()))
}

pub fn display_id(name: &str) -> Result<(PanelId, DisplayId), LookupError> {
    DISPLAYS
        .iter()
        .find(|(n, _, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, panel, id)| (panel, id))
        .ok_or_else(|| LookupError::UnknownDisplay(name.to_owned()))
}

impl FromStr for PanelId {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        panel_id(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_ignore_case() {
        assert_eq!(panel_id("Radio"), Ok(PanelId::Radio));
        assert_eq!("switch".parse::<PanelId>(), Ok(PanelId::Switch));
        assert_eq!(switch_id("act_1"), Ok((PanelId::Radio, radio::ACT_1)));
        assert_eq!(switch_id("Gear_Down"), Ok((PanelId::Switch, switch::GEAR_DOWN)));
        assert_eq!(led_bits("n_yellow"), Ok(switch::N_GREEN | switch::N_RED));
        assert_eq!(display_id("row_2"), Ok((PanelId::Multi, multi::ROW_2)));
    }

    #[test]
    fn unknown_names_are_errors() {
        assert_eq!(panel_id("fip"), Err(LookupError::UnknownPanel("fip".into())));
        assert_eq!(switch_id("flaps"), Err(LookupError::UnknownSwitch("flaps".into())));
        assert_eq!(led_bits("blue"), Err(LookupError::UnknownLed("blue".into())));
        assert_eq!(display_id("row_3"), Err(LookupError::UnknownDisplay("row_3".into())));
    }

    #[test]
    fn switch_names_are_unique_and_numbered_per_panel() {
        for (i, (name, panel, id)) in SWITCHES.iter().enumerate() {
            assert!(
                SWITCHES[i + 1..].iter().all(|(n, _, _)| n != name),
                "duplicate {}",
                name
            );
            assert_eq!(switch_name(*panel, *id), Some(*name));
        }
        assert_eq!(switch_name(PanelId::Multi, SwitchId(23)), None);
    }
}
