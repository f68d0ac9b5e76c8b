use std::path::PathBuf;
use std::process::Command;

/// Length of the abbreviated commit id written to the header.
pub const SHORT_HASH_LEN: usize = 7;

/// The two source-control queries the stamper needs.
pub trait SourceControl {
    /// Raw `git branch` listing, `None` when the query failed.
    fn branch_listing(&self) -> Option<String>;
    /// Full hash of the last commit, `None` when the query failed.
    fn head_hash(&self) -> Option<String>;
}

/// Runs the `git` binary inside the source directory.
pub struct GitCli {
    dir: PathBuf,
}

impl GitCli {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn git(&self, args: &[&str]) -> Option<String> {
        let output = match Command::new("git").args(args).current_dir(&self.dir).output() {
            Ok(o) => o,
            Err(e) => {
                tracing::warn!(?args, error = %e, "failed to run git");
                return None;
            }
        };
        if !output.status.success() {
            tracing::warn!(
                ?args,
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "git query failed"
            );
            return None;
        }
        String::from_utf8(output.stdout).ok()
    }
}

impl SourceControl for GitCli {
    fn branch_listing(&self) -> Option<String> {
        self.git(&["branch"])
    }

    fn head_hash(&self) -> Option<String> {
        self.git(&["log", "-n1", "--format=%H"])
    }
}

/// Resolve the branch name, substituting `trunk` for detached heads and
/// for listings that carry no active branch.
pub fn query_branch(scm: &dyn SourceControl, trunk: &str) -> String {
    let token = scm.branch_listing().and_then(|l| active_branch(&l));
    match token {
        Some(t) => normalize_branch(&t, trunk),
        None => {
            tracing::warn!(trunk, "no active branch found, using trunk label");
            trunk.to_string()
        }
    }
}

/// Short id of the last commit; absent output is not an error.
pub fn query_commit(scm: &dyn SourceControl) -> Option<String> {
    let commit = scm.head_hash().and_then(|out| short_commit(&out));
    if commit.is_none() {
        tracing::warn!("no commit hash available, revision will be omitted");
    }
    commit
}

/// Extract the active branch token from a `git branch` listing.
///
/// Takes the line marked `* `, drops the first `)` and keeps the last
/// segment after a space or slash, so both `* feature/x` and
/// `* (HEAD detached at 1a2b3c4)` yield a single token.
pub fn active_branch(listing: &str) -> Option<String> {
    let rest = listing
        .lines()
        .find_map(|l| l.strip_prefix("* "))
        .map(|r| r.trim_end_matches('\r'))
        .filter(|r| !r.is_empty())?;
    let rest = rest.replacen(')', "", 1);
    let token = rest.rsplit([' ', '/']).next()?;
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

pub fn normalize_branch(token: &str, trunk: &str) -> String {
    if is_short_hash(token) {
        trunk.to_string()
    } else {
        token.to_string()
    }
}

/// Exactly seven lowercase hex digits, as printed for a detached HEAD.
pub fn is_short_hash(token: &str) -> bool {
    token.len() == SHORT_HASH_LEN
        && token
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

pub fn short_commit(output: &str) -> Option<String> {
    let hash = output.trim();
    if hash.is_empty() {
        return None;
    }
    Some(hash.chars().take(SHORT_HASH_LEN).collect())
}
