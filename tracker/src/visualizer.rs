use shared::FishingActivityRecord;
use std::fs;
use std::path::{Path, PathBuf};

use crate::aggregate;
use crate::charts;
use crate::error::RenderError;
use crate::maps::{self, HeatLayerOptions};

/// Renders the record table into standalone HTML pages.
///
/// The table is borrowed for the visualizer's lifetime and never modified;
/// every rendering derives its own aggregate.
pub struct Visualizer<'a> {
    records: &'a [FishingActivityRecord],
    open_viewer: bool,
}

impl<'a> Visualizer<'a> {
    pub fn new(records: &'a [FishingActivityRecord], open_viewer: bool) -> Result<Self, RenderError> {
        if records.is_empty() {
            return Err(RenderError::EmptyTable);
        }
        Ok(Self {
            records,
            open_viewer,
        })
    }

    pub fn create_heatmap(&self, path: &Path) -> Result<PathBuf, RenderError> {
        let points = aggregate::heat_points(self.records);
        let page = maps::heatmap_page(&points, &HeatLayerOptions::default())?;
        self.save(path, &page.into_string())?;
        log::info!("Map saved: {}", path.display());
        Ok(path.to_path_buf())
    }

    pub fn plot_temporal_trends(&self, path: &Path) -> Result<PathBuf, RenderError> {
        let daily = aggregate::hours_by_date(self.records);
        let plot = charts::temporal_trend(&daily);
        self.save(path, &plot.to_html())?;
        log::info!("Temporal chart saved: {} ({} days)", path.display(), daily.len());
        Ok(path.to_path_buf())
    }

    pub fn plot_country_comparison(&self, path: &Path) -> Result<PathBuf, RenderError> {
        let by_flag = aggregate::hours_by_flag(self.records);
        let plot = charts::country_comparison(&by_flag);
        self.save(path, &plot.to_html())?;
        log::info!("Country chart saved: {} ({} flags)", path.display(), by_flag.len());
        Ok(path.to_path_buf())
    }

    pub fn plot_spatial_distribution(&self, path: &Path) -> Result<PathBuf, RenderError> {
        let page = maps::scatter_page(self.records)?;
        self.save(path, &page.into_string())?;
        log::info!("Spatial distribution saved: {}", path.display());
        Ok(path.to_path_buf())
    }

    fn save(&self, path: &Path, contents: &str) -> Result<(), RenderError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, contents)?;

        if self.open_viewer {
            if let Err(e) = open::that(path) {
                log::warn!("Could not open {}: {}", path.display(), e);
            }
        }
        Ok(())
    }
}
