mod app;
mod arch;
mod config;
mod data;
mod output;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::arch::Arch;
use crate::config::StamperConfig;
use crate::data::{CiNotifier, GitCli};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("PREBUILD_GIT_REV"),
    ")"
);

/// Stamp revision.h and print the build title of a Ruby MinGW build.
#[derive(Debug, Parser)]
#[command(version, long_version = LONG_VERSION)]
struct Cli {
    /// Target width: 32 or 64 (default 64).
    #[arg(
        value_name = "ARCH",
        allow_hyphen_values = true,
        allow_negative_numbers = true
    )]
    arch: Option<String>,

    /// Project root holding the Ruby source directory. Defaults to the
    /// current directory, not the location of this binary, so pass it when
    /// calling from elsewhere in the pipeline.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Config file (default: <root>/prebuild.toml, then the user config dir).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Anything after ARCH is accepted and ignored.
    #[arg(hide = true)]
    extra: Vec<String>,
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only the title (RUST_LOG=debug for detail).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let arch = match Arch::from_arg(cli.arch.as_deref()) {
        Ok(arch) => arch,
        Err(e) => {
            tracing::debug!(arg = %e.0, "rejected architecture selector");
            println!("{e}");
            std::process::exit(1);
        }
    };

    if !cli.extra.is_empty() {
        tracing::debug!(extra = ?cli.extra, "ignoring extra arguments");
    }

    let cfg = StamperConfig::load(cli.config.as_deref(), &cli.root)?;
    let source_root = cfg.source_root(&cli.root);
    tracing::debug!(?arch, source_root = %source_root.display(), "starting");

    let git = GitCli::new(source_root.clone());
    let ci = CiNotifier::from_env(&cfg.ci);
    let ctx = App::new(&cfg, source_root, &git, ci).run(arch)?;

    tracing::info!(
        arch = ?ctx.arch,
        version = %ctx.version,
        patch = %ctx.patch,
        date = %ctx.date,
        branch = %ctx.branch,
        commit = ?ctx.commit,
        "stamped"
    );
    println!("{}", ctx.title);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["ruby-prebuild"]).unwrap();
        assert_eq!(cli.arch, None);
        assert_eq!(cli.root, PathBuf::from("."));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_positional_arch() {
        let cli = Cli::try_parse_from(["ruby-prebuild", "32", "--root", "C:/src"]).unwrap();
        assert_eq!(cli.arch.as_deref(), Some("32"));
        assert_eq!(cli.root, PathBuf::from("C:/src"));
    }

    #[test]
    fn test_cli_hyphen_arch_reaches_validation() {
        let cli = Cli::try_parse_from(["ruby-prebuild", "-64"]).unwrap();
        assert!(Arch::from_arg(cli.arch.as_deref()).is_err());
    }

    #[test]
    fn test_cli_extra_args_are_ignored() {
        let cli = Cli::try_parse_from(["ruby-prebuild", "64", "extra", "more"]).unwrap();
        assert_eq!(Arch::from_arg(cli.arch.as_deref()), Ok(Arch::X64));
        assert_eq!(cli.extra, vec!["extra".to_string(), "more".to_string()]);
    }

    #[test]
    fn test_cli_root_help_mentions_current_directory() {
        use clap::CommandFactory;
        let cmd = Cli::command();
        let root = cmd
            .get_arguments()
            .find(|a| a.get_id() == "root")
            .unwrap();
        let help = root.get_long_help().or(root.get_help()).unwrap().to_string();
        assert!(help.contains("current directory"));
    }

    #[test]
    fn test_long_version_carries_build_revision() {
        assert_eq!(
            LONG_VERSION,
            format!("{} ({})", env!("CARGO_PKG_VERSION"), env!("PREBUILD_GIT_REV"))
        );
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
