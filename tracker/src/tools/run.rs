use crate::cli::RunArgs;
use crate::config::GfwConfig;
use crate::gfw_source::{GfwClient, ReportRequest, DEFAULT_AREA};
use crate::pipeline::{self, OutputPaths, PipelineOutcome, RenderOptions};

pub async fn exec(paths: &OutputPaths, open_viewer: bool, args: RunArgs) -> anyhow::Result<()> {
    println!("=== Mediterranean Fishing Activity Tracker ===");

    let config = GfwConfig::from_env()?;
    let client = GfwClient::new(config)?;

    let request = ReportRequest::fishing_effort(
        args.start_date,
        args.end_date,
        DEFAULT_AREA,
        args.flags.as_slice(),
    )
    .with_spatial_resolution(args.spatial_resolution);

    let options = RenderOptions {
        open_viewer,
        with_spatial: args.with_spatial,
    };

    match pipeline::run(&client, &request, paths, &options).await? {
        PipelineOutcome::Completed { records, outputs } => {
            println!("Done: {} records rendered into {} files", records, outputs.len());
            for path in outputs {
                println!("  {}", path.display());
            }
            Ok(())
        }
        PipelineOutcome::Aborted { reason } => {
            Err(anyhow::anyhow!("pipeline aborted: {}", reason))
        }
    }
}
