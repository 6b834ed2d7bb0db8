use clap::Parser;
use cli::{Cli, Command};
use pipeline::OutputPaths;

mod aggregate;
mod charts;
mod cli;
mod config;
mod error;
mod gfw_source;
mod maps;
mod pipeline;
mod report;
mod store;
mod tools;
mod visualizer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args = Cli::parse();
    let paths = OutputPaths::under(&args.base_dir);
    let open_viewer = !args.no_open;

    match args.cmd {
        Command::Run(run_args) => tools::run::exec(&paths, open_viewer, run_args).await,
        Command::Render(render_args) => tools::render::exec(&paths, open_viewer, render_args),
        Command::Vessels(vessels_args) => tools::vessels::exec(&paths, vessels_args).await,
    }
}
