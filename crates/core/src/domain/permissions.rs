use std::fmt;
use std::str::FromStr;

use super::DomainError;

/// Unix permission bits (`rwx` for user, group and other).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Permissions(u32);

impl Permissions {
    pub const MASK: u32 = 0o777;

    /// Default mode for directories created implicitly by PUT and POST.
    pub const IMPLICIT_DIRECTORY: Self = Self(0o700);

    /// Parses an octal string such as `0644` or `4755`.
    ///
    /// Only the digits `0`-`7` are accepted: no `0o`/`0x` prefix, no sign and
    /// no surrounding whitespace. Any value that fits in 32 bits is valid;
    /// bits outside [`Self::MASK`] (setuid, sticky, ...) are dropped.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidPermissions(value.to_string());

        if value.is_empty() || !value.bytes().all(|b| matches!(b, b'0'..=b'7')) {
            return Err(invalid());
        }

        let mode = u32::from_str_radix(value, 8).map_err(|_| invalid())?;
        Ok(Self::from_mode(mode))
    }

    /// Keeps only the permission bits of a full `st_mode`.
    pub fn from_mode(mode: u32) -> Self {
        Self(mode & Self::MASK)
    }

    pub fn mode(self) -> u32 {
        self.0
    }
}

impl FromStr for Permissions {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0{:o}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Permissions;

    #[test]
    fn parses_common_modes() {
        assert_eq!(Permissions::parse("0644").map(Permissions::mode), Ok(0o644));
        assert_eq!(Permissions::parse("755").map(Permissions::mode), Ok(0o755));
        assert_eq!(Permissions::parse("0").map(Permissions::mode), Ok(0));
    }

    #[test]
    fn rejects_non_octal_input() {
        for raw in ["", "bad", "0x600", "0o600", "0800", "-644", " 644", "644\n"] {
            let err = Permissions::parse(raw).expect_err("input should be rejected");
            assert_eq!(err.to_string(), format!("invalid octal permissions: {raw:?}"));
        }
    }

    #[test]
    fn masks_bits_outside_rwx() {
        assert_eq!(Permissions::parse("4755").map(Permissions::mode), Ok(0o755));
        assert_eq!(Permissions::parse("01000").map(Permissions::mode), Ok(0));
        assert_eq!(Permissions::parse("1777").map(|p| p.to_string()), Ok("0777".to_string()));
    }

    #[test]
    fn rejects_values_wider_than_32_bits() {
        assert!(Permissions::parse("37777777777").is_ok());
        assert!(Permissions::parse("40000000000").is_err());
        assert!(Permissions::parse("77777777777777777777777").is_err());
    }

    #[test]
    fn display_round_trips_every_mode() {
        for mode in 0..=Permissions::MASK {
            let rendered = Permissions::from_mode(mode).to_string();
            assert!(rendered.starts_with('0'));
            assert!(rendered.len() <= 4);
            assert_eq!(Permissions::parse(&rendered).map(Permissions::mode), Ok(mode));
        }
    }

    #[test]
    fn from_mode_strips_file_type_bits() {
        assert_eq!(Permissions::from_mode(0o100644).to_string(), "0644");
        assert_eq!(Permissions::from_mode(0o040755).to_string(), "0755");
    }
}
