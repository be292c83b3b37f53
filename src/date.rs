//! PDF date strings (`D:YYYYMMDDHHmmSS+HH'mm'`).

use chrono::{DateTime, FixedOffset};

/// Format a date the way `/CreationDate` and `/ModDate` expect.
///
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use pdf_scribe::date::format_pdf_date;
///
/// let tz = FixedOffset::east_opt(3600 + 1800).unwrap();
/// let date = tz.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
/// assert_eq!(format_pdf_date(&date), "D:20240115103000+01'30'");
/// ```
pub fn format_pdf_date(date: &DateTime<FixedOffset>) -> String {
    let offset = date.offset().local_minus_utc();
    let sign = if offset < 0 { '-' } else { '+' };
    let minutes = offset.abs() / 60;
    format!(
        "D:{}{}{:02}'{:02}'",
        date.format("%Y%m%d%H%M%S"),
        sign,
        minutes / 60,
        minutes % 60
    )
}

/// The current local time with its UTC offset.
pub fn now() -> DateTime<FixedOffset> {
    chrono::Local::now().fixed_offset()
}
