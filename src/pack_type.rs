//! Asset categories requested by callers and the manifest extension each one maps to.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Kind of asset being requested from the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PackType {
  /// JavaScript bundles, stored under the `js` extension.
  Javascript,
  /// Stylesheets, stored under the `css` extension.
  Stylesheet,
  /// Any other category. The string is used verbatim as the extension.
  Other(String),
}

impl PackType {
  /// Canonical manifest extension for this pack type, without the leading dot.
  pub fn extension(&self) -> &str {
    match self {
      Self::Javascript => "js",
      Self::Stylesheet => "css",
      Self::Other(extension) => extension,
    }
  }
}

impl From<&str> for PackType {
  fn from(value: &str) -> Self {
    match value {
      "javascript" => Self::Javascript,
      "stylesheet" => Self::Stylesheet,
      other => Self::Other(other.to_string()),
    }
  }
}

impl FromStr for PackType {
  type Err = Infallible;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    Ok(Self::from(value))
  }
}

impl fmt::Display for PackType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Javascript => f.write_str("javascript"),
      Self::Stylesheet => f.write_str("stylesheet"),
      Self::Other(value) => f.write_str(value),
    }
  }
}
