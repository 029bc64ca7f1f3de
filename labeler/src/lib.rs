//! QR asset labels: generate QR code images from the asset table and lay
//! them out on printable label sheets.

pub mod config;
pub mod services;

use std::process::ExitCode;
use std::str::FromStr;

use tracing_subscriber::EnvFilter;

pub use config::{AppConfig, CaptionMode};
pub use services::composer::{ComposeError, ComposeReport};
pub use services::generator::{GenerateError, GenerateReport};
pub use services::resolver::ResolveError;

/// Install the stdout tracing subscriber (`RUST_LOG` overrides `info`).
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

/// Stage selected on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Generate,
    Compose,
    /// Generate, then compose.
    All,
    /// Print the shelf URL for an asset id or a scanned lookup URL.
    Resolve(String),
}

impl Stage {
    /// Parse the command line arguments after the program name.
    ///
    /// No arguments selects [`Stage::All`]; `resolve` takes the asset id as
    /// its second argument.
    pub fn from_args<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let Some(name) = args.next() else {
            return Ok(Self::All);
        };
        let stage = if name == "resolve" {
            let Some(query) = args.next() else {
                anyhow::bail!("usage: resolve <WISE_ID>");
            };
            Self::Resolve(query)
        } else {
            name.parse()?
        };
        if let Some(extra) = args.next() {
            anyhow::bail!("unexpected argument '{extra}'");
        }
        Ok(stage)
    }
}

impl FromStr for Stage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generate" => Ok(Self::Generate),
            "compose" => Ok(Self::Compose),
            "all" => Ok(Self::All),
            "resolve" => anyhow::bail!("usage: resolve <WISE_ID>"),
            other => anyhow::bail!(
                "unknown stage '{other}' (expected generate, compose, all or resolve)"
            ),
        }
    }
}

/// Run `stage` and map its outcome to a process exit status.
///
/// The generator only fails the process for an invalid configuration; the
/// composer also fails it when the image directory is missing or the
/// document could not be written. Resolving fails it when the asset has no
/// shelf URL.
pub fn run_stage(stage: &Stage, config: &AppConfig) -> ExitCode {
    let problems = crate::config::validate(config);
    if !problems.is_empty() {
        for problem in &problems {
            tracing::error!("Invalid configuration: {problem}");
        }
        return ExitCode::FAILURE;
    }

    match stage {
        Stage::Generate => {
            run_generate(config);
            ExitCode::SUCCESS
        }
        Stage::Compose => run_compose(config),
        Stage::All => {
            run_generate(config);
            run_compose(config)
        }
        Stage::Resolve(query) => run_resolve(config, query),
    }
}

fn run_generate(config: &AppConfig) {
    if let Err(e) = services::generator::run(config) {
        tracing::debug!("QR code generation stopped: {e}");
    }
}

fn run_compose(config: &AppConfig) -> ExitCode {
    match services::composer::run(config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("Sheet composition failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_resolve(config: &AppConfig, query: &str) -> ExitCode {
    match services::resolver::run(config, query) {
        Ok(url) => {
            println!("{url}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!("Shelf URL lookup failed: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_names_parse() {
        assert_eq!("generate".parse::<Stage>().unwrap(), Stage::Generate);
        assert_eq!("compose".parse::<Stage>().unwrap(), Stage::Compose);
        assert_eq!("all".parse::<Stage>().unwrap(), Stage::All);
        assert!("print".parse::<Stage>().is_err());
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn command_line_selects_stage() {
        assert_eq!(Stage::from_args(args(&[])).unwrap(), Stage::All);
        assert_eq!(Stage::from_args(args(&["compose"])).unwrap(), Stage::Compose);
        assert_eq!(
            Stage::from_args(args(&["resolve", "WISE-01"])).unwrap(),
            Stage::Resolve("WISE-01".into())
        );
        assert!(Stage::from_args(args(&["resolve"])).is_err());
        assert!(Stage::from_args(args(&["generate", "extra"])).is_err());
    }
}
