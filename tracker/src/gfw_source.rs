//! Global Fishing Watch 4Wings data source.
//!
//! Requests pre-aggregated fishing effort reports for a polygon and a date
//! range from the GFW v3 API.

use bytes::Bytes;
use chrono::{Days, NaiveDate};
use clap::ValueEnum;
use geojson::{Geometry, Value as GeoValue};
use serde_json::json;
use shared::LngLatBounds;

use crate::config::GfwConfig;
use crate::error::FetchError;
use crate::report::{self, FetchOutcome, VesselPresence};

/// 4Wings report endpoint, relative to the API base URL.
const REPORT_PATH: &str = "/v3/4wings/report";

pub const FISHING_EFFORT_DATASET: &str = "public-global-fishing-effort:latest";

/// Flag states compared by default: Spain, France, Italy.
pub const DEFAULT_FLAGS: [&str; 3] = ["ESP", "FRA", "ITA"];

/// Western Mediterranean: Sardinia, the Balearics and Catalonia.
pub const DEFAULT_AREA: LngLatBounds = LngLatBounds::new(0.5, 38.5, 9.5, 44.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SpatialResolution {
    Low,
    High,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemporalResolution {
    Daily,
    Entire,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupBy {
    Flag,
    VesselId,
}

impl SpatialResolution {
    fn as_param(&self) -> &'static str {
        match self {
            SpatialResolution::Low => "LOW",
            SpatialResolution::High => "HIGH",
        }
    }
}

impl TemporalResolution {
    fn as_param(&self) -> &'static str {
        match self {
            TemporalResolution::Daily => "DAILY",
            TemporalResolution::Entire => "ENTIRE",
        }
    }
}

impl GroupBy {
    fn as_param(&self) -> &'static str {
        match self {
            GroupBy::Flag => "FLAG",
            GroupBy::VesselId => "VESSEL_ID",
        }
    }
}

/// Parameters of one 4Wings report request.
#[derive(Clone, Debug)]
pub struct ReportRequest {
    pub dataset: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub spatial_resolution: SpatialResolution,
    pub temporal_resolution: TemporalResolution,
    pub group_by: GroupBy,
    pub filters: Vec<String>,
    pub area: LngLatBounds,
}

impl ReportRequest {
    /// Daily fishing effort grouped by flag, restricted to the given flags.
    pub fn fishing_effort<S: AsRef<str>>(
        start_date: NaiveDate,
        end_date: NaiveDate,
        area: LngLatBounds,
        flags: &[S],
    ) -> Self {
        let filters = flag_filter(flags).into_iter().collect();

        Self {
            dataset: FISHING_EFFORT_DATASET.to_string(),
            start_date,
            end_date,
            spatial_resolution: SpatialResolution::Low,
            temporal_resolution: TemporalResolution::Daily,
            group_by: GroupBy::Flag,
            filters,
            area,
        }
    }

    /// Vessels with fishing activity in the area on a single day.
    pub fn vessels_on(date: NaiveDate, area: LngLatBounds) -> Self {
        Self {
            dataset: FISHING_EFFORT_DATASET.to_string(),
            start_date: date,
            end_date: date.checked_add_days(Days::new(1)).unwrap_or(date),
            spatial_resolution: SpatialResolution::Low,
            temporal_resolution: TemporalResolution::Entire,
            group_by: GroupBy::VesselId,
            filters: vec![],
            area,
        }
    }

    pub fn with_spatial_resolution(self, spatial_resolution: SpatialResolution) -> Self {
        Self {
            spatial_resolution,
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), FetchError> {
        if self.end_date < self.start_date {
            return Err(FetchError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    pub fn date_range(&self) -> String {
        format!(
            "{},{}",
            self.start_date.format("%Y-%m-%d"),
            self.end_date.format("%Y-%m-%d")
        )
    }

    pub fn query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("datasets[0]".to_string(), self.dataset.clone()),
            ("date-range".to_string(), self.date_range()),
            (
                "spatial-resolution".to_string(),
                self.spatial_resolution.as_param().to_string(),
            ),
            (
                "temporal-resolution".to_string(),
                self.temporal_resolution.as_param().to_string(),
            ),
            ("group-by".to_string(), self.group_by.as_param().to_string()),
            ("format".to_string(), "JSON".to_string()),
        ];
        for (i, filter) in self.filters.iter().enumerate() {
            query.push((format!("filters[{}]", i), filter.clone()));
        }
        query
    }

    pub fn body(&self) -> serde_json::Value {
        json!({ "geojson": polygon(&self.area) })
    }
}

/// Three ASCII letters, e.g. `ESP`.
pub fn is_flag_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic())
}

/// Filter expression selecting the given flag states,
/// e.g. `flag in ('ESP', 'FRA', 'ITA')`.
///
/// Codes that are not ISO3 flag codes are skipped; `None` when none is left.
pub fn flag_filter<S: AsRef<str>>(flags: &[S]) -> Option<String> {
    let quoted: Vec<String> = flags
        .iter()
        .map(|f| f.as_ref().trim().to_uppercase())
        .filter(|code| {
            let valid = is_flag_code(code);
            if !valid {
                log::warn!("Ignoring invalid flag code {:?}", code);
            }
            valid
        })
        .map(|code| format!("'{}'", code))
        .collect();

    if quoted.is_empty() {
        None
    } else {
        Some(format!("flag in ({})", quoted.join(", ")))
    }
}

pub fn polygon(area: &LngLatBounds) -> Geometry {
    let ring: Vec<Vec<f64>> = area
        .ring()
        .iter()
        .map(|p| vec![p.lng(), p.lat()])
        .collect();
    Geometry::new(GeoValue::Polygon(vec![ring]))
}

/// Client for the GFW API. Holds the access token for its whole lifetime.
pub struct GfwClient {
    client: reqwest::Client,
    config: GfwConfig,
}

impl GfwClient {
    pub fn new(config: GfwConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn report_url(&self) -> String {
        format!("{}{}", self.config.api_url, REPORT_PATH)
    }

    /// Download a fishing effort report.
    ///
    /// Returns `FetchOutcome::Empty` when the provider has no rows for the
    /// window; every other problem is a `FetchError`. Nothing is retried.
    pub async fn fishing_effort_report(
        &self,
        request: &ReportRequest,
    ) -> Result<FetchOutcome, FetchError> {
        request.validate()?;

        log::info!(
            "Downloading fishing effort from {} to {}",
            request.start_date,
            request.end_date
        );
        log::info!("Area: {}", request.body()["geojson"]);

        let body = self.post_report(request).await?;
        let outcome = report::decode_fishing_report(&body)?;

        if let FetchOutcome::Data(records) = &outcome {
            log::info!("Downloaded {} records", records.len());
        }
        Ok(outcome)
    }

    /// Vessels with apparent fishing activity in the area on `date`.
    pub async fn vessels_in_area(
        &self,
        area: LngLatBounds,
        date: NaiveDate,
    ) -> Result<Vec<VesselPresence>, FetchError> {
        let request = ReportRequest::vessels_on(date, area);
        log::info!("Looking up vessels on {}", date);

        let body = self.post_report(&request).await?;
        report::decode_vessel_report(&body)
    }

    async fn post_report(&self, request: &ReportRequest) -> Result<Bytes, FetchError> {
        let url = self.report_url();

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_token)
            .query(&request.query())
            .json(&request.body())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Api {
                status,
                message: truncate(message.trim(), 300),
            });
        }

        Ok(response.bytes().await?)
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
