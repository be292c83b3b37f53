//! Locale-independent number formatting for PDF output.
//!
//! Reals are written with a fixed number of decimal places so that
//! floating-point noise never reaches the file. The decimal separator is
//! always `.` and no digit grouping is used.

use crate::error::{Error, Result};

/// Default number of decimal places.
pub const DEFAULT_PRECISION: u8 = 6;

/// Largest supported number of decimal places.
pub const MAX_PRECISION: u8 = 16;

/// Format `value` with exactly `dec` decimal places.
///
/// Fails with an argument error when `dec` exceeds [`MAX_PRECISION`] or the
/// value is NaN or infinite (neither can be expressed in PDF syntax).
///
/// ```
/// use pdf_scribe::number::format_double;
///
/// assert_eq!(format_double(1.0, 6).unwrap(), "1.000000");
/// assert_eq!(format_double(-0.5, 2).unwrap(), "-0.50");
/// ```
pub fn format_double(value: f64, dec: u8) -> Result<String> {
    if dec > MAX_PRECISION {
        return Err(Error::illegal_argument(format!(
            "Decimal places must be between 0 and {}, got {}",
            MAX_PRECISION, dec
        )));
    }
    if !value.is_finite() {
        return Err(Error::illegal_argument(format!(
            "Cannot write non-finite number {} to PDF",
            value
        )));
    }
    let formatted = format!("{:.*}", dec as usize, value);
    // Rounding can yield "-0.00"; PDF readers accept it, but it is noise.
    if formatted.starts_with('-') && formatted[1..].bytes().all(|b| b == b'0' || b == b'.') {
        return Ok(formatted[1..].to_string());
    }
    Ok(formatted)
}

/// Clamp a requested precision into the supported range 1..=16.
pub fn clamp_precision(dec: u8) -> u8 {
    dec.clamp(1, MAX_PRECISION)
}
