use serde::Serialize;
use shared::{FishingActivityRecord, LngLatBounds};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DailyHours {
    pub date: String,
    pub hours: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlagHours {
    pub flag: String,
    pub hours: f64,
}

/// Total hours per distinct date string, ordered by the date key.
pub fn hours_by_date(records: &[FishingActivityRecord]) -> Vec<DailyHours> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for r in records {
        *totals.entry(r.date.as_str()).or_insert(0.0) += r.hours;
    }

    totals
        .into_iter()
        .map(|(date, hours)| DailyHours {
            date: date.to_string(),
            hours,
        })
        .collect()
}

/// Total hours per flag, largest first. Equal totals keep flag order.
pub fn hours_by_flag(records: &[FishingActivityRecord]) -> Vec<FlagHours> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for r in records {
        *totals.entry(r.flag.as_str()).or_insert(0.0) += r.hours;
    }

    let mut by_flag: Vec<FlagHours> = totals
        .into_iter()
        .map(|(flag, hours)| FlagHours {
            flag: flag.to_string(),
            hours,
        })
        .collect();
    // stable sort, ties stay in flag order
    by_flag.sort_by(|a, b| b.hours.total_cmp(&a.hours));
    by_flag
}

/// `[lat, lon, weight]` triples, weight being the fishing hours.
pub fn heat_points(records: &[FishingActivityRecord]) -> Vec<[f64; 3]> {
    records.iter().map(|r| [r.lat, r.lon, r.hours]).collect()
}

pub fn total_hours(records: &[FishingActivityRecord]) -> f64 {
    records.iter().map(|r| r.hours).sum()
}

pub fn distinct_flags(records: &[FishingActivityRecord]) -> Vec<&str> {
    records
        .iter()
        .map(|r| r.flag.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Number of records positioned outside `area`.
pub fn outside_area(records: &[FishingActivityRecord], area: &LngLatBounds) -> usize {
    records
        .iter()
        .filter(|r| !area.contains(&r.position()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn sample() -> Vec<FishingActivityRecord> {
        vec![
            record("2025-06-19", "ITA", 2.5),
            record("2025-06-18", "ESP", 10.0),
            record("2025-06-18", "FRA", 0.75),
            record("2025-06-20", "ESP", 3.3),
            record("2025-06-19", "ESP", 1.1),
            record("2025-06-20", "ITA", 8.0),
        ]
    }

    #[test]
    fn test_hours_by_date_preserves_total() {
        let records = sample();
        let daily = hours_by_date(&records);

        let grouped: f64 = daily.iter().map(|d| d.hours).sum();
        assert!((grouped - total_hours(&records)).abs() < 1e-9);

        let dates: Vec<&str> = daily.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-06-18", "2025-06-19", "2025-06-20"]);
        assert!((daily[0].hours - 10.75).abs() < 1e-9);
    }

    #[test]
    fn test_hours_by_flag_sorted_descending() {
        let by_flag = hours_by_flag(&sample());

        assert_eq!(by_flag.len(), 3);
        assert_eq!(by_flag[0].flag, "ESP");
        for pair in by_flag.windows(2) {
            assert!(pair[0].hours >= pair[1].hours);
        }
    }

    #[test]
    fn test_hours_by_flag_ties_keep_flag_order() {
        let records = vec![record("d", "ITA", 1.0), record("d", "ESP", 1.0)];
        let flags: Vec<String> = hours_by_flag(&records).into_iter().map(|f| f.flag).collect();
        assert_eq!(flags, vec!["ESP", "ITA"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(hours_by_date(&[]).is_empty());
        assert!(hours_by_flag(&[]).is_empty());
        assert_eq!(total_hours(&[]), 0.0);
    }

    #[test]
    fn test_distinct_flags_and_heat_points() {
        let records = sample();
        assert_eq!(distinct_flags(&records), vec!["ESP", "FRA", "ITA"]);
        assert_eq!(heat_points(&records)[1], [41.0, 3.0, 10.0]);
    }

    #[test]
    fn test_outside_area() {
        let mut records = sample();
        records[0].lon = 12.0;
        let area = LngLatBounds::new(0.5, 38.5, 9.5, 44.0);
        assert_eq!(outside_area(&records, &area), 1);
    }
}
