use crate::panel::PanelState;
use chrono::{DateTime, Local};
use std::fmt::Write;
use telemetry::tinygs::modem::NOT_AVAILABLE;
use telemetry::tinygs::view::StationView;

const DETAILS_LABEL_WIDTH: usize = 20;
const MODEM_LABEL_WIDTH: usize = 10;
const RULE: &str = "----------------------------------------";

pub fn render(state: &PanelState) -> String {
    match state {
        PanelState::Idle => String::new(),
        PanelState::Loading => "Loading...".to_string(),
        PanelState::Failed(message) => message.clone(),
        PanelState::Loaded(view) => render_view(view),
    }
}

/// Formats epoch milliseconds as a local date-time.
pub fn format_timestamp(epoch_millis: i64) -> String {
    match DateTime::from_timestamp_millis(epoch_millis) {
        Some(ts) => ts
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn render_view(view: &StationView) -> String {
    let location = match view.location() {
        Some([lat, lon]) => format!("{lat},  {lon}"),
        None => NOT_AVAILABLE.to_string(),
    };
    let mut out = String::new();

    let _ = writeln!(out, "Station Details");
    let _ = writeln!(out, "{RULE}");
    line(&mut out, DETAILS_LABEL_WIDTH, "Name", view.name());
    line(&mut out, DETAILS_LABEL_WIDTH, "User ID", view.user_id());
    line(&mut out, DETAILS_LABEL_WIDTH, "Location", location);
    line(
        &mut out,
        DETAILS_LABEL_WIDTH,
        "Elevation",
        format!("{} meters", view.elevation()),
    );
    line(&mut out, DETAILS_LABEL_WIDTH, "Antenna", view.antenna());
    line(
        &mut out,
        DETAILS_LABEL_WIDTH,
        "Auto Tune Frequency",
        format!("{} MHz", view.auto_tune()),
    );
    line(
        &mut out,
        DETAILS_LABEL_WIDTH,
        "Confirmed Packets",
        view.confirmed_packets(),
    );
    line(
        &mut out,
        DETAILS_LABEL_WIDTH,
        "Last Packet Time",
        format_timestamp(view.last_packet_time()),
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "{:^40}", view.satellite());
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out);

    line(&mut out, MODEM_LABEL_WIDTH, "Mode", view.mode());
    line(
        &mut out,
        MODEM_LABEL_WIDTH,
        "Frequency",
        format!("{} MHz", view.freq()),
    );
    line(&mut out, MODEM_LABEL_WIDTH, "NORAD", view.norad());
    line(&mut out, MODEM_LABEL_WIDTH, "Power", view.pwr());
    line(&mut out, MODEM_LABEL_WIDTH, "CRC", view.crc());
    line(&mut out, MODEM_LABEL_WIDTH, "Gain", view.gain());

    out
}

fn line(out: &mut String, width: usize, label: &str, value: impl std::fmt::Display) {
    let _ = writeln!(out, "{label:<width$}: {value}");
}
