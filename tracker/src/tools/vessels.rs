use chrono::Utc;

use crate::cli::VesselsArgs;
use crate::config::GfwConfig;
use crate::gfw_source::{GfwClient, DEFAULT_AREA};
use crate::pipeline::OutputPaths;
use crate::store;

pub async fn exec(paths: &OutputPaths, args: VesselsArgs) -> anyhow::Result<()> {
    let date = args.date.unwrap_or_else(|| Utc::now().date_naive());

    let config = GfwConfig::from_env()?;
    let client = GfwClient::new(config)?;

    let vessels = match client.vessels_in_area(DEFAULT_AREA, date).await {
        Ok(vessels) => vessels,
        Err(e) => {
            log::error!("Vessel lookup failed: {}", e);
            return Err(e.into());
        }
    };

    if vessels.is_empty() {
        println!("No vessels with fishing activity on {}", date);
        return Ok(());
    }

    println!("{} vessels with fishing activity on {}:", vessels.len(), date);
    for v in &vessels {
        println!(
            "  {:<24} {:<4} {:<10} {:>7.1} h",
            v.ship_name.as_deref().unwrap_or("?"),
            v.flag.as_deref().unwrap_or("?"),
            v.mmsi.as_deref().unwrap_or("-"),
            v.hours
        );
    }

    store::write_vessels(&paths.vessels_csv, &vessels)?;
    Ok(())
}
