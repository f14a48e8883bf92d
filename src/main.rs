use std::time::Duration;

use fpanels::config::{self, AppConfig};
use fpanels::panels::{multi, radio, switch};
use fpanels::{
    names, DisplayTarget, LedTarget, MultiPanel, PanelEvent, RadioPanel, SwitchPanel,
    SwitchSource, SwitchStream,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let config = match std::env::args().nth(1) {
        Some(path) => config::load_config_from_path(&path)?,
        None => AppConfig::default(),
    };

    let radio_panel = match config.panels.radio {
        true => Some(RadioPanel::open_with_config(&config.panel)?),
        false => None,
    };
    let multi_panel = match config.panels.multi {
        true => Some(MultiPanel::open_with_config(&config.panel)?),
        false => None,
    };
    let switch_panel = match config.panels.switch {
        true => Some(SwitchPanel::open_with_config(&config.panel)?),
        false => None,
    };

    self_test(radio_panel.as_ref(), multi_panel.as_ref(), switch_panel.as_ref()).await?;
    println!("Ready to process switch events!");

    let mut streams: [Option<SwitchStream>; 3] = [
        radio_panel.as_ref().map(|p| p.watch_switches()),
        multi_panel.as_ref().map(|p| p.watch_switches()),
        switch_panel.as_ref().map(|p| p.watch_switches()),
    ];
    while streams.iter().any(Option::is_some) {
        let (slot, event) = tokio::select! {
            event = next_event(&streams[0]) => (0, event),
            event = next_event(&streams[1]) => (1, event),
            event = next_event(&streams[2]) => (2, event),
            _ = tokio::signal::ctrl_c() => break,
        };
        match event {
            Some(PanelEvent::Switch(event)) => {
                let name = names::switch_name(event.panel, event.switch).unwrap_or("?");
                println!("{}: {} ({}): {}", event.panel, name, event.switch, event.on as u8);
                if let Some(radio_panel) = &radio_panel {
                    radio_panel.display_int(radio::ACTIVE_1, event.switch.0 as i64)?;
                    radio_panel.display_int(radio::STANDBY_1, event.on as i64)?;
                }
            }
            Some(PanelEvent::Disconnected { panel, error }) => {
                eprintln!("{} panel disconnected: {}", panel, error);
            }
            None => streams[slot] = None,
        }
    }

    for panel in [
        radio_panel.as_ref().map(|p| p as &dyn SwitchSource),
        multi_panel.as_ref().map(|p| p as &dyn SwitchSource),
        switch_panel.as_ref().map(|p| p as &dyn SwitchSource),
    ]
    .into_iter()
    .flatten()
    {
        panel.close();
    }
    Ok(())
}

async fn next_event(stream: &Option<SwitchStream>) -> Option<PanelEvent> {
    match stream {
        Some(stream) => stream.recv().await,
        None => std::future::pending().await,
    }
}

async fn self_test(
    radio_panel: Option<&RadioPanel>,
    multi_panel: Option<&MultiPanel>,
    switch_panel: Option<&SwitchPanel>,
) -> Result<(), Box<dyn std::error::Error>> {
    for i in -100..=100i64 {
        if let Some(panel) = radio_panel {
            panel.display_int(radio::ACTIVE_1, i)?;
            panel.display_string(radio::ACTIVE_2, &i.to_string())?;
            panel.display_float(radio::STANDBY_2, i as f64 / 8.0, 2)?;
        }
        if let Some(panel) = multi_panel {
            panel.display_int(multi::ROW_1, i)?;
            panel.leds_on_off(multi::LED_AP, (i % 2) as f64)?;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    if let Some(panel) = switch_panel {
        panel.set_leds(switch::N_RED | switch::L_RED | switch::R_GREEN)?;
        tokio::time::sleep(Duration::from_millis(500)).await;
        panel.leds_off(switch::N_RED)?;
        tokio::time::sleep(Duration::from_millis(500)).await;
        panel.leds_on(switch::N_YELLOW)?;
        tokio::time::sleep(Duration::from_millis(500)).await;
        panel.leds_off(switch::ALL_YELLOW)?;
    }
    if let Some(panel) = radio_panel {
        panel.display_off()?;
    }
    if let Some(panel) = multi_panel {
        panel.set_leds(0)?;
        panel.display_string(multi::ROW_1, "")?;
    }
    Ok(())
}
