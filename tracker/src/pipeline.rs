use anyhow::Result;
use shared::{FishingActivityRecord, LngLatBounds};
use std::path::{Path, PathBuf};

use crate::aggregate;
use crate::error::FetchError;
use crate::gfw_source::{GfwClient, ReportRequest};
use crate::report::FetchOutcome;
use crate::store;
use crate::visualizer::Visualizer;

const API_DOCUMENTATION: &str = "https://globalfishingwatch.org/our-apis/documentation";

/// Where every artifact of a run is written.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputPaths {
    pub raw_csv: PathBuf,
    pub vessels_csv: PathBuf,
    pub heatmap: PathBuf,
    pub temporal_chart: PathBuf,
    pub country_chart: PathBuf,
    pub spatial_chart: PathBuf,
}

impl OutputPaths {
    pub fn under(base: &Path) -> Self {
        OutputPaths {
            raw_csv: base.join("data/raw/fishing_data.csv"),
            vessels_csv: base.join("data/raw/vessels.csv"),
            heatmap: base.join("outputs/maps/fishing_heatmap.html"),
            temporal_chart: base.join("outputs/charts/temporal_trends.html"),
            country_chart: base.join("outputs/charts/country_comparison.html"),
            spatial_chart: base.join("outputs/charts/spatial_distribution.html"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RenderOptions {
    pub open_viewer: bool,
    pub with_spatial: bool,
}

#[derive(Debug, PartialEq)]
pub enum PipelineOutcome {
    Completed { records: usize, outputs: Vec<PathBuf> },
    /// Nothing usable was downloaded; no file was written.
    Aborted { reason: String },
}

/// Download the report, then store and render it.
pub async fn run(
    client: &GfwClient,
    request: &ReportRequest,
    paths: &OutputPaths,
    options: &RenderOptions,
) -> Result<PipelineOutcome> {
    println!("Step 1: downloading data from Global Fishing Watch...");
    println!(
        "  {} to {}, flags: {}",
        request.start_date,
        request.end_date,
        if request.filters.is_empty() {
            "all".to_string()
        } else {
            request.filters.join(" and ")
        }
    );
    println!("  area: {}", request.body()["geojson"]);
    let outcome = client.fishing_effort_report(request).await;
    process(outcome, &request.area, paths, options)
}

/// Everything after the download. A failed or empty download stops here
/// before any CSV, map or chart is written.
pub fn process(
    outcome: Result<FetchOutcome, FetchError>,
    area: &LngLatBounds,
    paths: &OutputPaths,
    options: &RenderOptions,
) -> Result<PipelineOutcome> {
    let records = match outcome {
        Ok(FetchOutcome::Data(records)) => records,
        Ok(FetchOutcome::Empty) => {
            return Ok(abort("the report has no rows for this window".to_string()))
        }
        Err(e) => return Ok(abort(format!("download failed: {}", e))),
    };

    store::write_records(&paths.raw_csv, &records)?;
    println!("Data saved: {} records", records.len());

    println!("Step 2: exploratory summary...");
    println!("{}", summarize(&records, area));

    println!("Step 3: rendering...");
    let outputs = render(&records, paths, options)?;

    Ok(PipelineOutcome::Completed {
        records: records.len(),
        outputs,
    })
}

/// Render every output for an in-memory table.
pub fn render(
    records: &[FishingActivityRecord],
    paths: &OutputPaths,
    options: &RenderOptions,
) -> Result<Vec<PathBuf>> {
    let viz = Visualizer::new(records, options.open_viewer)?;

    log::info!("Creating heatmap...");
    let mut outputs = vec![viz.create_heatmap(&paths.heatmap)?];

    log::info!("Creating temporal chart...");
    outputs.push(viz.plot_temporal_trends(&paths.temporal_chart)?);

    log::info!("Creating country comparison...");
    outputs.push(viz.plot_country_comparison(&paths.country_chart)?);

    if options.with_spatial {
        log::info!("Creating spatial distribution...");
        outputs.push(viz.plot_spatial_distribution(&paths.spatial_chart)?);
    }

    Ok(outputs)
}

fn abort(reason: String) -> PipelineOutcome {
    log::error!("No data downloaded: {}", reason);
    log::error!(
        "Check the GFW API documentation ({}) for the report parameters, \
         the free plan limits and the returned data format",
        API_DOCUMENTATION
    );
    PipelineOutcome::Aborted { reason }
}

/// First rows, columns, flags present and total hours of the table.
fn summarize(records: &[FishingActivityRecord], area: &LngLatBounds) -> String {
    let mut lines: Vec<String> = records
        .iter()
        .take(5)
        .map(|r| {
            format!(
                "  {} {} lat={:.3} lon={:.3} hours={:.2} vessel={}",
                r.date,
                r.flag,
                r.lat,
                r.lon,
                r.hours,
                r.vessel_name.as_deref().unwrap_or("-")
            )
        })
        .collect();
    lines.push(format!(
        "Columns: {}",
        FishingActivityRecord::COLUMNS.join(", ")
    ));
    lines.push(format!(
        "Flags present: {}",
        aggregate::distinct_flags(records).join(", ")
    ));
    lines.push(format!(
        "Total fishing hours: {:.1}",
        aggregate::total_hours(records)
    ));

    let outside = aggregate::outside_area(records, area);
    if outside > 0 {
        log::warn!("{} records lie outside the requested area", outside);
        lines.push(format!("Outside the requested area: {} records", outside));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfw_source::DEFAULT_AREA;

    fn record(date: &str, flag: &str, hours: f64) -> FishingActivityRecord {
        FishingActivityRecord {
            lat: 41.0,
            lon: 3.0,
            hours,
            date: date.to_string(),
            flag: flag.to_string(),
            vessel_name: None,
        }
    }

    fn options() -> RenderOptions {
        RenderOptions {
            open_viewer: false,
            with_spatial: false,
        }
    }

    fn files_under(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| {
                        let path = e.path();
                        if path.is_dir() {
                            files_under(&path)
                        } else {
                            1
                        }
                    })
                    .sum()
            })
            .unwrap_or(0)
    }

    #[test]
    fn test_output_paths() {
        let paths = OutputPaths::under(Path::new("/tmp/run"));
        assert_eq!(paths.raw_csv, PathBuf::from("/tmp/run/data/raw/fishing_data.csv"));
        assert_eq!(
            paths.heatmap,
            PathBuf::from("/tmp/run/outputs/maps/fishing_heatmap.html")
        );
        assert_eq!(
            paths.country_chart,
            PathBuf::from("/tmp/run/outputs/charts/country_comparison.html")
        );
    }

    #[test]
    fn test_failed_download_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = OutputPaths::under(dir.path());
        let error = FetchError::Api {
            status: reqwest::StatusCode::FORBIDDEN,
            message: "free plan limit".to_string(),
        };

        let outcome = process(Err(error), &DEFAULT_AREA, &paths, &options()).unwrap();

        match outcome {
            PipelineOutcome::Aborted { reason } => assert!(reason.contains("free plan limit")),
            other => panic!("expected abort, got {:?}", other),
        }
        assert_eq!(files_under(dir.path()), 0);
        assert!(!paths.heatmap.exists());
    }

    #[test]
    fn test_empty_download_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = OutputPaths::under(dir.path());

        let outcome = process(Ok(FetchOutcome::Empty), &DEFAULT_AREA, &paths, &options()).unwrap();

        assert!(matches!(outcome, PipelineOutcome::Aborted { .. }));
        assert_eq!(files_under(dir.path()), 0);
    }

    #[test]
    fn test_completed_run() {
        let dir = tempfile::tempdir().unwrap();
        let paths = OutputPaths::under(dir.path());
        let records = vec![
            record("2025-06-18", "ESP", 12.5),
            record("2025-06-19", "ITA", 4.0),
            record("2025-06-19", "FRA", 1.5),
        ];

        let outcome = process(
            Ok(FetchOutcome::Data(records.clone())),
            &DEFAULT_AREA,
            &paths,
            &options(),
        )
        .unwrap();

        assert_eq!(
            outcome,
            PipelineOutcome::Completed {
                records: 3,
                outputs: vec![
                    paths.heatmap.clone(),
                    paths.temporal_chart.clone(),
                    paths.country_chart.clone(),
                ],
            }
        );
        assert!(!paths.spatial_chart.exists());
        assert_eq!(store::read_records(&paths.raw_csv).unwrap(), records);
    }

    #[test]
    fn test_summary_lists_rows_columns_and_flags() {
        let mut records: Vec<_> = (0..7)
            .map(|i| record(&format!("2025-06-{}", 18 + i), "ITA", 1.0))
            .collect();
        records[0].flag = "ESP".to_string();
        records[0].vessel_name = Some("SAN PIETRO".to_string());

        let summary = summarize(&records, &DEFAULT_AREA);
        let lines: Vec<&str> = summary.lines().collect();

        assert_eq!(lines.len(), 8);
        assert_eq!(
            lines[0],
            "  2025-06-18 ESP lat=41.000 lon=3.000 hours=1.00 vessel=SAN PIETRO"
        );
        assert!(lines[4].starts_with("  2025-06-22 ITA"));
        assert_eq!(lines[5], "Columns: lat, lon, hours, date, flag, vessel_name");
        assert_eq!(lines[6], "Flags present: ESP, ITA");
        assert_eq!(lines[7], "Total fishing hours: 7.0");
    }

    #[test]
    fn test_summary_reports_records_outside_area() {
        let mut far = record("2025-06-18", "ESP", 2.0);
        far.lat = 10.0;

        let summary = summarize(&[record("2025-06-18", "ESP", 1.0), far], &DEFAULT_AREA);

        assert!(summary.ends_with("Outside the requested area: 1 records"));
    }

    #[test]
    fn test_render_with_spatial() {
        let dir = tempfile::tempdir().unwrap();
        let paths = OutputPaths::under(dir.path());
        let options = RenderOptions {
            open_viewer: false,
            with_spatial: true,
        };

        let outputs = render(&[record("2025-06-18", "ESP", 2.0)], &paths, &options).unwrap();

        assert_eq!(outputs.len(), 4);
        assert!(paths.spatial_chart.exists());
    }

    #[test]
    fn test_render_empty_table_fails() {
        let dir = tempfile::tempdir().unwrap();
        let paths = OutputPaths::under(dir.path());

        assert!(render(&[], &paths, &options()).is_err());
        assert!(!paths.heatmap.exists());
    }
}
