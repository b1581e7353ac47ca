use serde::{Deserialize, Deserializer, Serialize};

pub const STATION_ENDPOINT: &str = "https://api.tinygs.com/v1/station/";

/// Joins the endpoint base with a station identifier, tolerating a missing trailing slash.
pub fn station_url(base: &str, station: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), station)
}

/// Reads the leading latitude/longitude pair, ignoring any trailing altitude.
fn deserialize_location<'de, D>(deserializer: D) -> Result<Option<[f64; 2]>, D::Error>
where
    D: Deserializer<'de>,
{
    let coords = Option::<Vec<Option<f64>>>::deserialize(deserializer)?;
    Ok(match coords.as_deref() {
        Some([Some(lat), Some(lon), ..]) => Some([*lat, *lon]),
        _ => None,
    })
}

/// A station as returned by the station endpoint.
///
/// Fields the panel never reads default when missing so that older or partially
/// provisioned stations still decode.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StationRecord {
    pub name: String,
    pub user_id: u64,
    /// Latitude, longitude. `None` when the service sends `null` or fewer than two numbers.
    #[serde(default, deserialize_with = "deserialize_location")]
    pub location: Option<[f64; 2]>,
    pub elevation: f64,
    #[serde(default)]
    pub auto_update: bool,
    #[serde(default)]
    pub beta: bool,
    #[serde(default)]
    pub test: bool,
    #[serde(default)]
    pub tx: bool,
    pub confirmed_packets: u64,
    #[serde(default)]
    pub telemetry_packets: u64,
    #[serde(default)]
    pub frames: u64,
    pub creation_date: Option<i64>,
    pub last_seen: Option<i64>,
    /// Epoch milliseconds.
    pub last_packet_time: i64,
    pub antenna: String,
    #[serde(default)]
    pub antenna_band: Vec<f64>,
    pub auto_tune: f64,
    /// A JSON document carried as text. Decoded by [`super::modem::ModemConfig::decode`].
    #[serde(rename = "modem_conf")]
    pub modem_conf: String,
    pub satellite: Option<String>,
    #[serde(rename = "local_ip")]
    pub local_ip: Option<String>,
    pub radio_status: Option<i64>,
    pub status: Option<i64>,
    pub version: Option<i64>,
    pub wifi_rssi: Option<i64>,
    pub record_distance: Option<f64>,
}
