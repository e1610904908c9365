use crate::config::FolioConfig;
use anyhow::{Result, anyhow};
use clap::{Arg, ArgMatches, Command};
use folio_core::RenderContext;
use folio_core::sections::search_document;
use folio_core::source_for;

pub fn make_subcommand() -> Command {
    Command::new("search")
        .about("Print the project grid filtered by a query")
        .arg(
            Arg::new("query")
                .value_name("QUERY")
                .help("Case-insensitive text matched against title, description and tags")
                .required(true),
        )
        .arg(
            Arg::new("content")
                .short('i')
                .long("content")
                .value_name("PATH|URL")
                .help("Content document to search")
                .default_value("./site/content.json"),
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

pub async fn execute(args: &ArgMatches) -> Result<()> {
    let folio_config = FolioConfig::load(args)?;
    let query = args
        .get_one::<String>("query")
        .map(String::as_str)
        .unwrap_or_default();

    let source = source_for(&folio_config.build.content);
    let doc = source.load().await?;

    let mut ctx = RenderContext::new(
        folio_config.site.render.layout.unwrap_or_default(),
        folio_config.site.render.reveal,
    );
    let html = search_document(&doc, query, &mut ctx)
        .ok_or_else(|| anyhow!("{} has no projects section", source.describe()))?;

    println!("{html}");
    Ok(())
}
