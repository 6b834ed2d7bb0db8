//! Standalone Leaflet pages: a weighted heatmap and a proportional scatter.

use maud::{html, Markup, PreEscaped, DOCTYPE};
use serde::Serialize;
use serde_json::json;
use shared::{FishingActivityRecord, LngLat};

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const LEAFLET_HEAT_JS: &str = "https://unpkg.com/leaflet.heat@0.2.0/dist/leaflet-heat.js";

const OSM_TILES: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const OSM_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

/// Between Sardinia and Barcelona.
pub const MAP_CENTER: LngLat = LngLat(5.0, 41.5);
pub const HEATMAP_ZOOM: u8 = 6;
pub const SCATTER_ZOOM: u8 = 5;

pub const HEATMAP_TITLE: &str = "Fishing Activity Heatmap";
pub const SCATTER_TITLE: &str = "Geographic Distribution of Fishing Activity";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeatLayerOptions {
    pub min_opacity: f64,
    pub radius: u32,
    pub blur: u32,
    pub max_zoom: u32,
}

impl Default for HeatLayerOptions {
    fn default() -> Self {
        HeatLayerOptions {
            min_opacity: 0.3,
            radius: 15,
            blur: 20,
            max_zoom: 10,
        }
    }
}

// Reds, light to dark
const REDS: [(f64, [u8; 3]); 4] = [
    (0.0, [254, 224, 210]),
    (0.35, [252, 146, 114]),
    (0.7, [222, 45, 38]),
    (1.0, [103, 0, 13]),
];

const MIN_RADIUS: f64 = 3.0;
const MAX_RADIUS: f64 = 18.0;

#[derive(Debug, Serialize)]
struct ScatterMarker {
    lat: f64,
    lon: f64,
    radius: f64,
    color: String,
    popup: String,
}

/// Heat layer over OpenStreetMap, one `[lat, lon, weight]` point per record.
pub fn heatmap_page(points: &[[f64; 3]], options: &HeatLayerOptions) -> Result<Markup, serde_json::Error> {
    let max_weight = points
        .iter()
        .map(|p| p[2])
        .fold(0.0_f64, f64::max);
    let max = if max_weight > 0.0 { max_weight } else { 1.0 };

    let layer_options = json!({
        "minOpacity": options.min_opacity,
        "radius": options.radius,
        "blur": options.blur,
        "maxZoom": options.max_zoom,
        "max": max,
    });

    let script = format!(
        "{}\nL.heatLayer({}, {}).addTo(map);",
        base_map_script(HEATMAP_ZOOM),
        script_json(points)?,
        layer_options
    );

    Ok(page(HEATMAP_TITLE, &[LEAFLET_JS, LEAFLET_HEAT_JS], &script))
}

/// Circle markers sized and colored by hours, with flag and vessel name popups.
pub fn scatter_page(records: &[FishingActivityRecord]) -> Result<Markup, serde_json::Error> {
    let max_hours = records.iter().map(|r| r.hours).fold(0.0_f64, f64::max);

    let markers: Vec<ScatterMarker> = records
        .iter()
        .map(|r| {
            let t = if max_hours > 0.0 { r.hours / max_hours } else { 0.0 };
            ScatterMarker {
                lat: r.lat,
                lon: r.lon,
                radius: MIN_RADIUS + (MAX_RADIUS - MIN_RADIUS) * t.sqrt(),
                color: reds(t),
                popup: format!(
                    "{} | {} | {:.1} h",
                    r.flag,
                    r.vessel_name.as_deref().unwrap_or("unknown vessel"),
                    r.hours
                ),
            }
        })
        .collect();

    let script = format!(
        r#"{}
for (const m of {}) {{
  const popup = document.createElement('div');
  popup.textContent = m.popup;
  L.circleMarker([m.lat, m.lon], {{radius: m.radius, color: m.color, fillColor: m.color, fillOpacity: 0.7, weight: 1}})
    .bindPopup(popup)
    .addTo(map);
}}"#,
        base_map_script(SCATTER_ZOOM),
        script_json(&markers)?
    );

    Ok(page(SCATTER_TITLE, &[LEAFLET_JS], &script))
}

fn base_map_script(zoom: u8) -> String {
    format!(
        "const map = L.map('map').setView([{}, {}], {});\nL.tileLayer('{}', {{maxZoom: 19, attribution: '{}'}}).addTo(map);",
        MAP_CENTER.lat(),
        MAP_CENTER.lng(),
        zoom,
        OSM_TILES,
        OSM_ATTRIBUTION
    )
}

/// JSON safe to inline in a `<script>` element.
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// Color on the Reds scale for `t` in `0..=1`, as `#rrggbb`.
fn reds(t: f64) -> String {
    let t = t.clamp(0.0, 1.0);
    let upper = REDS.iter().position(|(stop, _)| *stop >= t).unwrap_or(REDS.len() - 1);
    let rgb = if upper == 0 {
        REDS[0].1
    } else {
        let (s0, c0) = REDS[upper - 1];
        let (s1, c1) = REDS[upper];
        let f = (t - s0) / (s1 - s0);
        std::array::from_fn(|i| (c0[i] as f64 + (c1[i] as f64 - c0[i] as f64) * f).round() as u8)
    };
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

fn page(title: &str, scripts: &[&str], script: &str) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href=(LEAFLET_CSS);
                @for src in scripts {
                    script src=(src) {}
                }
                style {
                    (PreEscaped("html, body, #map { height: 100%; margin: 0; }"))
                }
            }
            body {
                div id="map" {}
                script {
                    (PreEscaped(script))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(lat: f64, lon: f64, hours: f64, vessel_name: Option<&str>) -> FishingActivityRecord {
        FishingActivityRecord {
            lat,
            lon,
            hours,
            date: "2025-06-18".to_string(),
            flag: "ESP".to_string(),
            vessel_name: vessel_name.map(String::from),
        }
    }

    #[test]
    fn test_heatmap_page() {
        let points = vec![[41.2, 2.1, 12.5], [40.9, 8.3, 4.0]];
        let html = heatmap_page(&points, &HeatLayerOptions::default())
            .unwrap()
            .into_string();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(LEAFLET_HEAT_JS));
        assert!(html.contains("L.heatLayer([[41.2,2.1,12.5],[40.9,8.3,4.0]]"));
        assert!(html.contains("\"minOpacity\":0.3"));
        assert!(html.contains("\"radius\":15"));
        assert!(html.contains("\"blur\":20"));
        assert!(html.contains("\"maxZoom\":10"));
        assert!(html.contains("setView([41.5, 5], 6)"));
    }

    #[test]
    fn test_scatter_page_escapes_names() {
        let records = vec![
            record(41.2, 2.1, 10.0, Some("</script><b>BAD</b>")),
            record(40.9, 8.3, 2.5, None),
        ];
        let html = scatter_page(&records).unwrap().into_string();

        assert!(html.contains(SCATTER_TITLE));
        assert!(!html.contains("</script><b>"));
        assert!(html.contains("unknown vessel"));
        assert!(html.contains(&reds(1.0)));
    }

    #[test]
    fn test_reds_scale() {
        assert_eq!(reds(0.0), "#fee0d2");
        assert_eq!(reds(1.0), "#67000d");
        assert_eq!(reds(2.0), "#67000d");
        assert_eq!(reds(0.35), "#fc9272");
    }
}
