//! Step argument wrapper that strips the surrounding quotes Gherkin text uses.

use std::str::FromStr;

/// Quoted step argument with escaped newlines expanded.
#[derive(Debug, Clone)]
pub struct QuotedString(String);

impl FromStr for QuotedString {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim_matches('"').replace("\\n", "\n")))
    }
}

impl QuotedString {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
