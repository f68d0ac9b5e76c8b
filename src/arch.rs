use thiserror::Error;

/// Target width selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X64,
    I386,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Incorrect first argument, must be omitted, '32' or '64'")]
pub struct InvalidArch(pub String);

impl Arch {
    /// Map the optional selector argument. Absent means 64-bit.
    pub fn from_arg(arg: Option<&str>) -> Result<Self, InvalidArch> {
        match arg {
            None | Some("64") => Ok(Arch::X64),
            Some("32") => Ok(Arch::I386),
            Some(other) => Err(InvalidArch(other.to_string())),
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Arch::X64 => "[x64-mingw32]",
            Arch::I386 => "[i386-mingw32]",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_selectors() {
        assert_eq!(Arch::from_arg(None), Ok(Arch::X64));
        assert_eq!(Arch::from_arg(Some("64")), Ok(Arch::X64));
        assert_eq!(Arch::from_arg(Some("32")), Ok(Arch::I386));
    }

    #[test]
    fn test_invalid_selectors() {
        for bad in ["", "86", "x64", "-1", " 64", "640"] {
            assert!(Arch::from_arg(Some(bad)).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_tags() {
        assert_eq!(Arch::X64.tag(), "[x64-mingw32]");
        assert_eq!(Arch::I386.tag(), "[i386-mingw32]");
    }

    #[test]
    fn test_error_message() {
        let err = Arch::from_arg(Some("128")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Incorrect first argument, must be omitted, '32' or '64'"
        );
    }
}
