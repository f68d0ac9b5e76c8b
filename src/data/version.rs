use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("{0} is not defined")]
    MissingField(&'static str),
    #[error("{field} has unexpected value {value:?}")]
    InvalidField { field: &'static str, value: String },
    #[error("release date {year}-{month}-{day} is not a calendar date")]
    InvalidDate { year: i32, month: u32, day: u32 },
}

/// `#define NAME value` entries of a C header, in file order.
#[derive(Debug, Default)]
pub struct Defines<'a> {
    entries: Vec<(&'a str, &'a str)>,
}

impl<'a> Defines<'a> {
    /// Scan every line that starts with `#define`. Blank-separated by spaces
    /// or tabs; the value is the rest of the line, trimmed.
    pub fn scan(text: &'a str) -> Self {
        let entries = text
            .lines()
            .filter_map(|line| {
                let rest = line.strip_prefix("#define")?;
                if !rest.starts_with([' ', '\t']) {
                    return None;
                }
                let rest = rest.trim_start_matches([' ', '\t']);
                let (name, value) = rest.split_once([' ', '\t'])?;
                Some((name, value.trim()))
            })
            .collect();
        Self { entries }
    }

    /// First definition of `name` wins.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.all(name).next()
    }

    /// Every definition of `name`, in file order.
    pub fn all<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'a str> + 's {
        self.entries
            .iter()
            .filter(move |(n, _)| *n == name)
            .map(|(_, v)| *v)
    }

    /// First definition of `field` whose value `extract` accepts. Only the
    /// leading token matters to `extract`, so trailing comments are fine.
    fn extract<T>(
        &self,
        field: &'static str,
        extract: impl Fn(&str) -> Option<T>,
    ) -> Result<T, VersionError> {
        let first = self.get(field).ok_or(VersionError::MissingField(field))?;
        self.all(field)
            .find_map(extract)
            .ok_or_else(|| invalid(field, first))
    }
}

/// Fields read from `version.h`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    /// `None` when RUBY_VERSION is absent or not a literal; the caller then
    /// reads the API version header.
    pub version: Option<String>,
    pub patch_level: i64,
    pub release_date: NaiveDate,
}

impl VersionInfo {
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        let defines = Defines::scan(text);

        let version = defines.all("RUBY_VERSION").find_map(version_literal);
        let patch_level = defines.extract("RUBY_PATCHLEVEL", signed_number)?;

        let year = defines.extract("RUBY_RELEASE_YEAR", |v| number(v, 4, 4))?;
        let month = defines.extract("RUBY_RELEASE_MONTH", |v| number(v, 1, 2))?;
        let day = defines.extract("RUBY_RELEASE_DAY", |v| number(v, 1, 2))?;
        let (year, month, day) = (year as i32, month, day);
        let release_date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(VersionError::InvalidDate { year, month, day })?;

        Ok(Self {
            version,
            patch_level,
            release_date,
        })
    }

    pub fn patch_label(&self) -> String {
        patch_label(self.patch_level)
    }

    pub fn date_label(&self) -> String {
        self.release_date.format("%Y-%m-%d").to_string()
    }
}

/// `-1` marks a development snapshot.
pub fn patch_label(level: i64) -> String {
    if level == -1 {
        "dev".to_string()
    } else {
        format!("p{level}")
    }
}

/// `MAJOR.MINOR.TEENY` from `include/ruby/version.h`.
pub fn api_version(text: &str) -> Result<String, VersionError> {
    let defines = Defines::scan(text);
    let parts = [
        "RUBY_API_VERSION_MAJOR",
        "RUBY_API_VERSION_MINOR",
        "RUBY_API_VERSION_TEENY",
    ]
    .into_iter()
    .map(|field| {
        defines
            .extract(field, |v| number(v, 1, usize::MAX))
            .map(|n| n.to_string())
    })
    .collect::<Result<Vec<_>, _>>()?;
    Ok(parts.join("."))
}

/// A quoted run of digits and dots at the start of the value, e.g.
/// `"2.7.1"`. Anything after the closing quote is ignored.
fn version_literal(raw: &str) -> Option<String> {
    let rest = raw.strip_prefix(['"', '\''])?;
    let len = rest
        .bytes()
        .take_while(|b| b.is_ascii_digit() || *b == b'.')
        .count();
    if len == 0 || !rest[len..].starts_with(['"', '\'']) {
        return None;
    }
    Some(rest[..len].to_string())
}

/// Leading `-?\d+`.
fn signed_number(raw: &str) -> Option<i64> {
    let sign = usize::from(raw.starts_with('-'));
    let len = leading_digits(&raw[sign..], usize::MAX);
    if len == 0 {
        return None;
    }
    raw[..sign + len].parse().ok()
}

/// Leading run of at least `min` and at most `max` digits; a longer run
/// is cut at `max`.
fn number(raw: &str, min: usize, max: usize) -> Option<u32> {
    let len = leading_digits(raw, max);
    if len < min {
        return None;
    }
    raw[..len].parse().ok()
}

fn leading_digits(raw: &str, max: usize) -> usize {
    raw.bytes().take(max).take_while(|b| b.is_ascii_digit()).count()
}

fn invalid(field: &'static str, value: &str) -> VersionError {
    VersionError::InvalidField {
        field,
        value: value.to_string(),
    }
}
