//! Hex color validation.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new("^#[0-9A-Fa-f]{6}$").expect("hex color pattern is valid"));

/// Validate a `#RRGGBB` color string and normalize it to uppercase.
///
/// Returns `Error::InvalidInput` naming the rejected value otherwise.
pub fn normalize_color(color: &str) -> Result<String> {
    if !HEX_COLOR.is_match(color) {
        return Err(Error::InvalidInput(format!(
            "Invalid hex color: '{}'",
            color
        )));
    }
    Ok(color.to_uppercase())
}
