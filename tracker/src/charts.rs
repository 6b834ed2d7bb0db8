use plotly::common::{ColorScale, ColorScalePalette, Marker, Mode, Title};
use plotly::layout::{Axis, HoverMode, Layout};
use plotly::{Bar, Plot, Scatter};

use crate::aggregate::{DailyHours, FlagHours};

pub const TEMPORAL_TITLE: &str = "Fishing Activity over Time - Western Mediterranean";
pub const COUNTRY_TITLE: &str = "Fishing Activity by Flag";

const HOURS_LABEL: &str = "Total Fishing Hours";

/// Line chart of total hours per day.
pub fn temporal_trend(daily: &[DailyHours]) -> Plot {
    let dates: Vec<String> = daily.iter().map(|d| d.date.clone()).collect();
    let hours: Vec<f64> = daily.iter().map(|d| d.hours).collect();

    let trace = Scatter::new(dates, hours)
        .mode(Mode::Lines)
        .name("Fishing hours");

    let layout = Layout::new()
        .title(Title::with_text(TEMPORAL_TITLE))
        .x_axis(Axis::new().title(Title::with_text("Date")))
        .y_axis(Axis::new().title(Title::with_text(HOURS_LABEL)))
        .hover_mode(HoverMode::XUnified);

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(layout);
    plot
}

/// Bar chart of total hours per flag, bars colored by their value.
pub fn country_comparison(by_flag: &[FlagHours]) -> Plot {
    let flags: Vec<String> = by_flag.iter().map(|f| f.flag.clone()).collect();
    let hours: Vec<f64> = by_flag.iter().map(|f| f.hours).collect();

    // plotly's Blues runs dark to light, reversed so the busiest flag is darkest
    let marker = Marker::new()
        .color_array(hours.clone())
        .color_scale(ColorScale::Palette(ColorScalePalette::Blues))
        .reverse_scale(true)
        .show_scale(true);

    let trace = Bar::new(flags, hours).name(HOURS_LABEL).marker(marker);

    let layout = Layout::new()
        .title(Title::with_text(COUNTRY_TITLE))
        .x_axis(Axis::new().title(Title::with_text("Flag")))
        .y_axis(Axis::new().title(Title::with_text(HOURS_LABEL)));

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(layout);
    plot
}
