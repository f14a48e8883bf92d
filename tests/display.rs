mod common;

use common::{config, wait_until, FakeTransport};
use fpanels::panels::{multi, radio, switch};
use fpanels::segment::{BLANK, DECIMAL_POINT, OFF};
use fpanels::{
    DisplayId, DisplayTarget, LedTarget, MultiPanel, PanelError, PanelId, RadioPanel, SwitchPanel,
    SwitchSource, ValidationError,
};

#[test]
fn initial_frame_is_sent_as_set_report() {
    let (transport, recorder) = FakeTransport::new();
    let panel = RadioPanel::open_with(transport, &config()).unwrap();
    assert!(recorder.wait_for_write(|frame| frame == [BLANK; 20]).is_some());

    let write = recorder.writes().remove(0);
    assert_eq!(write.request_type, 0x21);
    assert_eq!(write.request, 0x09);
    assert_eq!(write.value, 0x03);
    assert_eq!(write.index, 0);
    panel.close();
}

#[test]
fn radio_numbers_reach_the_device() {
    let (transport, recorder) = FakeTransport::new();
    let panel = RadioPanel::open_with(transport, &config()).unwrap();

    panel.display_int(radio::ACTIVE_1, 12345).unwrap();
    panel.display_float(radio::STANDBY_1, -1.5, 1).unwrap();
    panel.display_float(radio::STANDBY_2, 118.25, 2).unwrap();

    let mut expected = [BLANK; 20];
    expected[..5].copy_from_slice(&[1, 2, 3, 4, 5]);
    expected[5..10].copy_from_slice(&[BLANK, BLANK, radio::MINUS, 1 | DECIMAL_POINT, 5]);
    expected[15..].copy_from_slice(&[1, 1, 8 | DECIMAL_POINT, 2, 5]);
    assert!(recorder.wait_for_write(|frame| frame == expected).is_some());
    assert_eq!(panel.display_bytes(), expected.to_vec());
    panel.close();
}

#[test]
fn rejected_values_leave_the_buffer_alone() {
    let (transport, _recorder) = FakeTransport::new();
    let panel = RadioPanel::open_with(transport, &config()).unwrap();
    panel.display_int(radio::ACTIVE_2, 42).unwrap();
    let before = panel.display_bytes();

    assert!(matches!(
        panel.display_float(radio::ACTIVE_2, 1.0, 6),
        Err(PanelError::Validation(ValidationError::DecimalsOutOfRange(6)))
    ));
    assert!(matches!(
        panel.display_int(radio::ACTIVE_2, 100_000),
        Err(PanelError::Validation(ValidationError::ValueOutOfRange(_)))
    ));
    assert!(matches!(
        panel.display_float(radio::ACTIVE_2, f64::NAN, 0),
        Err(PanelError::Validation(ValidationError::NotFinite))
    ));
    assert!(matches!(
        panel.display_int(DisplayId(4), 1),
        Err(PanelError::Validation(ValidationError::InvalidDisplaySlot {
            panel: PanelId::Radio,
            display: DisplayId(4)
        }))
    ));
    assert_eq!(panel.display_bytes(), before);
    panel.close();
}

#[test]
fn strings_update_only_what_they_name() {
    let (transport, recorder) = FakeTransport::new();
    let panel = MultiPanel::open_with(transport, &config()).unwrap();

    panel.display_string(multi::ROW_1, "12   ").unwrap();
    panel.display_string(multi::ROW_1, "** 34").unwrap();
    panel.display_string(multi::ROW_2, "-.5").unwrap();

    let expected = [
        1,
        2,
        BLANK,
        3,
        4,
        BLANK,
        BLANK,
        multi::MINUS,
        BLANK | DECIMAL_POINT,
        5,
        0,
    ];
    assert!(recorder.wait_for_write(|frame| frame == expected).is_some());
    panel.close();
}

#[test]
fn display_off_keeps_leds() {
    let (transport, recorder) = FakeTransport::new();
    let panel = MultiPanel::open_with(transport, &config()).unwrap();
    panel.display_int(multi::ROW_2, 250).unwrap();
    panel.leds_on(multi::LED_AP | multi::LED_HDG).unwrap();
    panel.display_off().unwrap();

    let mut expected = [OFF; 11];
    expected[10] = 0b11;
    assert!(recorder.wait_for_write(|frame| frame == expected).is_some());
    panel.close();
}

#[test]
fn multi_leds_combine() {
    let (transport, _recorder) = FakeTransport::new();
    let panel = MultiPanel::open_with(transport, &config()).unwrap();

    panel.set_leds(multi::LED_ALT | multi::LED_VS).unwrap();
    panel.leds_on(multi::LED_REV).unwrap();
    panel.leds_off(multi::LED_ALT).unwrap();
    assert_eq!(panel.display_bytes()[10], multi::LED_VS | multi::LED_REV);

    panel.leds_on_off(multi::LED_NAV, 3.0).unwrap();
    panel.leds_on_off(multi::LED_VS, 0.0).unwrap();
    assert_eq!(panel.display_bytes()[10], multi::LED_NAV | multi::LED_REV);
    panel.close();
}

#[test]
fn gear_leds_reach_the_device() {
    let (transport, recorder) = FakeTransport::new();
    let panel = SwitchPanel::open_with(transport, &config()).unwrap();
    assert!(recorder.wait_for_write(|frame| frame == [0]).is_some());

    panel.set_leds(switch::ALL_GREEN).unwrap();
    panel.leds_on(switch::N_RED).unwrap();
    panel.leds_off(switch::L_GREEN).unwrap();
    let expected = switch::N_YELLOW | switch::R_GREEN;
    assert_eq!(panel.leds(), expected);
    assert!(recorder.wait_for_write(|frame| frame == [expected]).is_some());
    panel.close();
}

#[test]
fn failed_write_is_retried_on_next_mutation() {
    let (transport, recorder) = FakeTransport::new();
    let panel = RadioPanel::open_with(transport, &config()).unwrap();
    assert!(recorder.wait_for_write(|frame| frame == [BLANK; 20]).is_some());
    assert_eq!(panel.last_write_error(), None);

    recorder.fail_next_writes(1);
    panel.display_int(radio::ACTIVE_1, 1).unwrap();
    assert!(wait_until(|| panel.last_write_error().is_some()));
    assert!(matches!(
        panel.check(),
        Err(PanelError::TransportWrite {
            panel: PanelId::Radio,
            ..
        })
    ));

    panel.display_int(radio::STANDBY_1, 2).unwrap();
    assert!(recorder
        .wait_for_write(|frame| frame[4] == 1 && frame[9] == 2)
        .is_some());
    assert!(wait_until(|| panel.last_write_error().is_none()));
    assert!(panel.check().is_ok());
    panel.close();
}

#[test]
fn rapid_updates_end_with_the_latest_state() {
    let (transport, recorder) = FakeTransport::new();
    let panel = RadioPanel::open_with(transport, &config()).unwrap();
    for value in 0..500 {
        panel.display_int(radio::ACTIVE_1, value).unwrap();
    }
    assert!(recorder
        .wait_for_write(|frame| frame[..5] == [BLANK, BLANK, 4, 9, 9])
        .is_some());
    panel.close();
    // No more than one frame per mutation, plus the initial one.
    assert!(recorder.writes().len() <= 501);
}

#[test]
fn switch_panel_has_no_displays() {
    let (transport, _recorder) = FakeTransport::new();
    let panel = SwitchPanel::open_with(transport, &config()).unwrap();
    assert_eq!(panel.leds(), 0);
    panel.close();
    assert!(matches!(
        panel.set_leds(switch::ALL_RED),
        Err(PanelError::Closed(PanelId::Switch))
    ));
}
