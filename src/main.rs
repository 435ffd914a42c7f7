use anyhow::Context;
use clap::Parser;

use vitrine::{
    demos::{DebugCube, MaterialsGallery, TextFigures},
    AppSettings, Cli, DemoKind,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet {
        log::LevelFilter::Warn
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    let settings = AppSettings::from(&cli);
    log::info!("Starting {:?} with assets from {}", cli.demo, settings.asset_root.display());

    match cli.demo {
        DemoKind::DebugCube => vitrine::run(DebugCube::default(), settings),
        DemoKind::Materials => vitrine::run(MaterialsGallery::default(), settings),
        DemoKind::Text => vitrine::run(TextFigures::default(), settings),
    }
    .with_context(|| format!("{:?} sketch stopped", cli.demo))
}
