mod commands;
mod config;
mod package;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Report, Result};

use commands::Command;
use config::Project;

#[derive(Parser)]
#[command(name = "soundkit")]
#[command(about = "Address extraction, artifact pruning and npm packaging for sound-protocol")]
#[command(version)]
struct Cli {
    /// Project root all configured paths are relative to
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Config file (defaults to soundkit.toml in the project root)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    if let Err(report) = run(cli, |var| std::env::var(var).ok()).await {
        if let Some(message) = usage_message(&report) {
            println!("{message}");
            std::process::exit(1);
        }
        return Err(report);
    }

    Ok(())
}

async fn run<F>(cli: Cli, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    // environment variables are checked before the config file is read
    let env = cli.command.resolve_env(lookup)?;
    let project = Project::load(&cli.root, cli.config.as_deref())?;
    cli.command.run(&project, env).await
}

/// Invalid environment variables are usage errors: the allowed values go to
/// stdout and the process exits 1 without a report
fn usage_message(report: &Report) -> Option<String> {
    report
        .downcast_ref::<soundkit_core::Error>()
        .filter(|err| err.is_configuration())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cli(root: &std::path::Path, command: &str) -> Cli {
        Cli::parse_from(["soundkit", "--root", root.to_str().unwrap(), command])
    }

    #[tokio::test]
    async fn test_environment_checked_before_config_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("soundkit.toml"), "[paths\nbroken").unwrap();

        let report = run(cli(dir.path(), "extract-addresses"), |_| None)
            .await
            .unwrap_err();

        assert_eq!(
            usage_message(&report).as_deref(),
            Some("Must specify SOUND_ENV: preview | staging | mainnet")
        );
    }

    #[tokio::test]
    async fn test_invalid_creator_type_is_usage_error() {
        let dir = TempDir::new().unwrap();
        let lookup = |var: &str| match var {
            "SOUND_ENV" => Some("mainnet".to_string()),
            "CREATOR_TYPE" => Some("ep".to_string()),
            _ => None,
        };

        let report = run(cli(dir.path(), "prep-release"), lookup)
            .await
            .unwrap_err();

        let message = usage_message(&report).unwrap();
        assert!(message.contains("CREATOR_TYPE"));
        assert!(message.contains("single | album"));
    }

    #[tokio::test]
    async fn test_other_failures_are_reports() {
        let dir = TempDir::new().unwrap();
        let lookup = |var: &str| (var == "EVM_NETWORK").then(|| "goerli".to_string());

        // no deployment log in an empty project
        let report = run(cli(dir.path(), "build-addresses"), lookup)
            .await
            .unwrap_err();

        assert_eq!(usage_message(&report), None);
    }
}
