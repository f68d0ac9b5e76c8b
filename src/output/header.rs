use std::path::Path;

use anyhow::{Context, Result};

pub const REVISION_MACRO: &str = "RUBY_REVISION";
pub const BRANCH_MACRO: &str = "RUBY_BRANCH_NAME";

/// Contents of `revision.h`. The revision line is left out when no commit
/// is known; the branch line is always present.
pub fn render(branch: &str, commit: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(commit) = commit {
        out.push_str(&format!("#define {REVISION_MACRO} {commit}\n"));
    }
    out.push_str(&format!("#define {BRANCH_MACRO} \"{branch}\"\n"));
    out
}

/// Overwrite the header in full.
pub fn write(path: &Path, branch: &str, commit: Option<&str>) -> Result<()> {
    std::fs::write(path, render(branch, commit))
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), branch, ?commit, "header written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_with_commit() {
        assert_eq!(
            render("trunk", Some("abc1234")),
            "#define RUBY_REVISION abc1234\n#define RUBY_BRANCH_NAME \"trunk\"\n"
        );
    }

    #[test]
    fn test_render_without_commit() {
        let text = render("ruby_2_7", None);
        assert_eq!(text, "#define RUBY_BRANCH_NAME \"ruby_2_7\"\n");
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_write_truncates_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("revision.h");
        std::fs::write(&path, "#define RUBY_REVISION old\n/* stale */\n#define X 1\n").unwrap();
        write(&path, "master", None).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "#define RUBY_BRANCH_NAME \"master\"\n"
        );
    }

    #[test]
    fn test_write_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("revision.h");
        let err = write(&path, "master", None).unwrap_err();
        assert!(err.to_string().contains("revision.h"));
    }
}
