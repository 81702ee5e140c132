use std::fmt;
use std::str::FromStr;

const ADDRESS_BYTES: usize = 8;
const ADDRESS_HEX_DIGITS: usize = ADDRESS_BYTES * 2;

/// Account address in canonical `0x` + 16 lowercase hex digit form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountAddress(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,
    #[error("address must have 16 hex digits, got {0}")]
    InvalidLength(usize),
    #[error("address contains non-hex character '{0}'")]
    InvalidCharacter(char),
}

impl AccountAddress {
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.is_empty() {
            return Err(AddressError::Empty);
        }

        if let Some(c) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(AddressError::InvalidCharacter(c));
        }

        if digits.len() != ADDRESS_HEX_DIGITS {
            return Err(AddressError::InvalidLength(digits.len()));
        }

        Ok(Self(format!("0x{}", digits.to_ascii_lowercase())))
    }

    pub fn from_bytes(bytes: [u8; ADDRESS_BYTES]) -> Self {
        let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        Self(format!("0x{}", hex))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for AccountAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
