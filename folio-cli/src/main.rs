mod cmd;
mod config;

use anyhow::Result;
use clap::Command;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("folio")
        .about("Render a portfolio website from a single JSON content document")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(cmd::build::make_subcommand())
        .subcommand(cmd::serve::make_subcommand())
        .subcommand(cmd::search::make_subcommand())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,folio=debug".into()),
        )
        .init();

    match cli().get_matches().subcommand() {
        Some(("build", args)) => cmd::build::execute(args).await,
        Some(("serve", args)) => cmd::serve::execute(args).await,
        Some(("search", args)) => cmd::search::execute(args).await,
        _ => unreachable!("subcommand_required is set"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        cli().debug_assert();
    }

    #[test]
    fn test_search_requires_query() {
        assert!(cli().try_get_matches_from(["folio", "search"]).is_err());
        let matches = cli()
            .try_get_matches_from(["folio", "search", "rust"])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "search");
        assert_eq!(args.get_one::<String>("query").map(String::as_str), Some("rust"));
    }
}
