use crate::config::FolioConfig;
use anyhow::Result;
use clap::{Arg, ArgMatches, Command};
use folio_core::build_site;
use std::path::Path;

pub fn add_build_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("content")
                .short('i')
                .long("content")
                .value_name("PATH|URL")
                .help("Content document to render")
                .default_value("./site/content.json"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Output directory for generated site")
                .default_value("./out"),
        )
        .arg(
            Arg::new("theme")
                .short('t')
                .long("theme")
                .value_name("DIR")
                .help("Theme directory")
                .default_value("./theme"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file")
                .default_value("./folio.toml"),
        )
}

pub fn make_subcommand() -> Command {
    add_build_args(Command::new("build")).about("Render the site from its content document")
}

pub async fn execute(args: &ArgMatches) -> Result<()> {
    let folio_config = FolioConfig::load(args)?;
    let build_config = folio_config.build_config();

    let output_dir = Path::new(&build_config.output);
    let theme_dir = Path::new(&build_config.theme);

    let report = build_site(
        &folio_config.site,
        &build_config.content,
        output_dir,
        theme_dir,
        "",
    )
    .await?;

    if report.fallback {
        tracing::warn!(
            content = %build_config.content,
            "content could not be loaded, wrote the fallback page"
        );
    }
    tracing::info!(
        pages = report.pages.len(),
        "Site built successfully in {}",
        output_dir.display()
    );

    Ok(())
}
