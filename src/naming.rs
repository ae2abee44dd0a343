//! Filename parsing for the `<digits>.<ext>` input convention.
//!
//! Only files whose whole stem is one or more ASCII decimal digits and whose
//! extension matches the configured image extension are batch inputs:
//!
//! - `"7.png"` → number `7`
//! - `"0012.png"` → number `12`
//! - `"12a.png"`, `"a12.png"`, `"12.png.bak"`, `".png"` → not an input
//!
//! Inputs are ordered by the numeric value of the digits, not lexically,
//! so `2.png` sorts before `10.png`. Digit runs of any length are supported.

use std::cmp::Ordering;

/// Numeric sort key of a digit run, compared by value without overflow.
///
/// Leading zeros are stripped; a longer significant run is a larger number,
/// runs of equal length compare lexically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NumericKey(String);

impl NumericKey {
    /// Build a key from a non-empty run of ASCII digits.
    pub fn from_digits(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let significant = digits.trim_start_matches('0');
        Some(Self(significant.to_string()))
    }

    /// The value as `u64`, if it fits.
    pub fn as_u64(&self) -> Option<u64> {
        if self.0.is_empty() {
            Some(0)
        } else {
            self.0.parse().ok()
        }
    }
}

impl Ord for NumericKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for NumericKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Parse `name` as `<digits>.<extension>`, matching the extension
/// case-insensitively. `extension` is given without the dot.
pub fn parse_numbered_file(name: &str, extension: &str) -> Option<NumericKey> {
    let (stem, ext) = name.rsplit_once('.')?;
    if !ext.eq_ignore_ascii_case(extension) {
        return None;
    }
    NumericKey::from_digits(stem)
}
