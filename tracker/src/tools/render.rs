use crate::cli::RenderArgs;
use crate::pipeline::{self, OutputPaths, RenderOptions};
use crate::store;

pub fn exec(paths: &OutputPaths, open_viewer: bool, args: RenderArgs) -> anyhow::Result<()> {
    let csv = args.csv.unwrap_or_else(|| paths.raw_csv.clone());
    let records = store::read_records(&csv)?;
    println!("Loaded {} records from {}", records.len(), csv.display());
    log::info!("Columns: {}", store::read_columns(&csv)?.join(", "));

    let options = RenderOptions {
        open_viewer,
        with_spatial: args.with_spatial,
    };
    let outputs = pipeline::render(&records, paths, &options)?;

    for path in outputs {
        println!("  {}", path.display());
    }
    Ok(())
}
