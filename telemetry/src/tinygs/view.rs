use crate::error::NormalizeError;
use crate::tinygs::modem::{ConfigValue, ModemConfig, NOT_AVAILABLE, is_truthy};
use crate::tinygs::station::StationRecord;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CrcStatus {
    Enabled,
    Disabled,
}

impl Display for CrcStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CrcStatus::Enabled => write!(f, "Enabled"),
            CrcStatus::Disabled => write!(f, "Disabled"),
        }
    }
}

/// Flattened station details with every fallback applied.
///
/// Only [`normalize`] builds one, so every field always holds a displayable value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationView {
    name: String,
    user_id: u64,
    location: Option<[f64; 2]>,
    elevation: f64,
    antenna: String,
    auto_tune: f64,
    confirmed_packets: u64,
    last_packet_time: i64,
    satellite: String,
    mode: ConfigValue,
    freq: ConfigValue,
    #[serde(rename = "NORAD")]
    norad: ConfigValue,
    pwr: ConfigValue,
    crc: CrcStatus,
    gain: ConfigValue,
}

impl StationView {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    /// Latitude, longitude, when the station reported a usable pair.
    pub fn location(&self) -> Option<[f64; 2]> {
        self.location
    }

    pub fn elevation(&self) -> f64 {
        self.elevation
    }

    pub fn antenna(&self) -> &str {
        &self.antenna
    }

    pub fn auto_tune(&self) -> f64 {
        self.auto_tune
    }

    pub fn confirmed_packets(&self) -> u64 {
        self.confirmed_packets
    }

    /// Epoch milliseconds, left for the presentation layer to format.
    pub fn last_packet_time(&self) -> i64 {
        self.last_packet_time
    }

    pub fn satellite(&self) -> &str {
        &self.satellite
    }

    pub fn mode(&self) -> &ConfigValue {
        &self.mode
    }

    pub fn freq(&self) -> &ConfigValue {
        &self.freq
    }

    pub fn norad(&self) -> &ConfigValue {
        &self.norad
    }

    pub fn pwr(&self) -> &ConfigValue {
        &self.pwr
    }

    pub fn crc(&self) -> CrcStatus {
        self.crc
    }

    pub fn gain(&self) -> &ConfigValue {
        &self.gain
    }
}

/// Derives the display-ready view of a station record.
///
/// Fails only when `modem_conf` cannot be decoded; individual keys inside it are optional.
/// Falsy configuration values (`0`, `""`, `false`, `null`) resolve to the same
/// placeholder as missing keys.
pub fn normalize(record: StationRecord) -> Result<StationView, NormalizeError> {
    let modem = ModemConfig::decode(&record.modem_conf)?;
    trace!(modem = ?modem, "decoded modem configuration");

    let crc = if modem.crc.as_ref().is_some_and(is_truthy) {
        CrcStatus::Enabled
    } else {
        CrcStatus::Disabled
    };

    let satellite = record
        .satellite
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    Ok(StationView {
        name: record.name,
        user_id: record.user_id,
        location: record.location,
        elevation: record.elevation,
        antenna: record.antenna,
        auto_tune: record.auto_tune,
        confirmed_packets: record.confirmed_packets,
        last_packet_time: record.last_packet_time,
        satellite,
        mode: ConfigValue::resolve(modem.mode),
        freq: ConfigValue::resolve(modem.freq),
        norad: ConfigValue::resolve(modem.norad),
        pwr: ConfigValue::resolve(modem.pwr),
        crc,
        gain: ConfigValue::resolve(modem.gain),
    })
}
