use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::arch::Arch;
use crate::config::StamperConfig;
use crate::data::{git, version, CiNotifier, SourceControl, VersionInfo};
use crate::output::{self, header, TitleParts};

/// Everything derived during one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    pub arch: Arch,
    pub branch: String,
    pub commit: Option<String>,
    pub version: String,
    pub patch: String,
    pub date: String,
    pub title: String,
}

/// One stamping run over a source tree.
pub struct App<'a> {
    cfg: &'a StamperConfig,
    source_root: PathBuf,
    scm: &'a dyn SourceControl,
    ci: Option<CiNotifier>,
}

impl<'a> App<'a> {
    pub fn new(
        cfg: &'a StamperConfig,
        source_root: PathBuf,
        scm: &'a dyn SourceControl,
        ci: Option<CiNotifier>,
    ) -> Self {
        Self {
            cfg,
            source_root,
            scm,
            ci,
        }
    }

    /// Query git, stamp the header, read the version and build the title.
    /// Sends the title to CI when a notifier is present.
    pub fn run(&self, arch: Arch) -> Result<BuildContext> {
        let branch = git::query_branch(self.scm, &self.cfg.trunk);
        let commit = git::query_commit(self.scm);
        tracing::info!(%branch, commit = commit.as_deref().unwrap_or("-"), "source state");

        header::write(&self.path(&self.cfg.header), &branch, commit.as_deref())?;

        let (version, info) = self.read_version()?;
        let patch = info.patch_label();
        let date = info.date_label();

        let title = output::compose(&TitleParts {
            product: &self.cfg.product,
            version: &version,
            patch: &patch,
            date: &date,
            branch: &branch,
            commit: commit.as_deref(),
            arch,
        });

        if let Some(ci) = &self.ci {
            ci.notify(&title);
        }

        Ok(BuildContext {
            arch,
            branch,
            commit,
            version,
            patch,
            date,
            title,
        })
    }

    fn read_version(&self) -> Result<(String, VersionInfo)> {
        let path = self.path(&self.cfg.version_file);
        let text = read(&path)?;
        let info =
            VersionInfo::parse(&text).with_context(|| format!("parsing {}", path.display()))?;

        let version = match &info.version {
            Some(v) => v.clone(),
            None => {
                let api_path = self.path(&self.cfg.api_version_file);
                tracing::debug!(
                    path = %api_path.display(),
                    "no RUBY_VERSION literal, reading API version"
                );
                let text = read(&api_path)?;
                version::api_version(&text)
                    .with_context(|| format!("parsing {}", api_path.display()))?
            }
        };
        Ok((version, info))
    }

    fn path(&self, rel: &Path) -> PathBuf {
        self.source_root.join(rel)
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
