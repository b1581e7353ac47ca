pub mod fetcher;
pub mod modem;
pub mod station;
pub mod view;

use crate::error::PipelineError;
use fetcher::StationFetcher;
use view::StationView;

/// One fetch followed by one normalize pass.
pub async fn load_station_view(
    fetcher: &StationFetcher,
    station: &str,
) -> Result<StationView, PipelineError> {
    let record = fetcher.fetch(station).await?;
    Ok(view::normalize(record)?)
}
