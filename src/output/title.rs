use crate::arch::Arch;

/// Inputs of the build title, borrowed from the run.
#[derive(Debug, Clone, Copy)]
pub struct TitleParts<'a> {
    pub product: &'a str,
    pub version: &'a str,
    pub patch: &'a str,
    pub date: &'a str,
    pub branch: &'a str,
    pub commit: Option<&'a str>,
    pub arch: Arch,
}

/// `ruby 2.7.1dev (2020-03-05 trunk abc1234) [x64-mingw32]`
pub fn compose(parts: &TitleParts<'_>) -> String {
    let detail = format!(
        "{} {} {}",
        parts.date,
        parts.branch,
        parts.commit.unwrap_or("")
    );
    format!(
        "{} {}{} ({}) {}",
        parts.product,
        parts.version,
        parts.patch,
        collapse_before_paren(&detail),
        parts.arch.tag()
    )
}

// Blanks left by an absent commit would otherwise sit before ')'.
fn collapse_before_paren(detail: &str) -> &str {
    detail.trim_end_matches(' ')
}
