use serde::{Deserialize, Serialize};

/// Longitude, latitude in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct LngLat(pub f64, pub f64);

impl LngLat {
    pub fn lng(&self) -> f64 {
        self.0
    }

    pub fn lat(&self) -> f64 {
        self.1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct LngLatBounds {
    pub sw: LngLat,
    pub ne: LngLat,
}

impl LngLatBounds {
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            sw: LngLat(west, south),
            ne: LngLat(east, north),
        }
    }

    /// Closed ring, counter-clockwise from the south-west corner.
    pub fn ring(&self) -> [LngLat; 5] {
        let se = LngLat(self.ne.lng(), self.sw.lat());
        let nw = LngLat(self.sw.lng(), self.ne.lat());
        [self.sw, se, self.ne, nw, self.sw]
    }

    pub fn contains(&self, p: &LngLat) -> bool {
        p.lng() >= self.sw.lng()
            && p.lng() <= self.ne.lng()
            && p.lat() >= self.sw.lat()
            && p.lat() <= self.ne.lat()
    }
}

/// One row of a fishing effort report: hours of apparent fishing attributed
/// to a grid cell, a day and a flag state.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct FishingActivityRecord {
    pub lat: f64,
    pub lon: f64,
    pub hours: f64,
    pub date: String,
    pub flag: String,
    pub vessel_name: Option<String>,
}

impl FishingActivityRecord {
    /// Column names, in CSV order.
    pub const COLUMNS: [&'static str; 6] = ["lat", "lon", "hours", "date", "flag", "vessel_name"];

    pub fn position(&self) -> LngLat {
        LngLat(self.lon, self.lat)
    }
}
