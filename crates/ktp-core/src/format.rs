//! Display helpers for catalog listings.

use chrono::{DateTime, Utc};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
const SIZE_BASE: f64 = 1024.0;

/// Format a byte count with base-1024 units, rounded to two decimals.
///
/// Trailing zeros are dropped (`1536` -> `"1.5 KB"`, `1024` -> `"1 KB"`). Sizes at or
/// above 1024 GB stay in GB.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut threshold = SIZE_BASE;
    while unit < SIZE_UNITS.len() - 1 && bytes as f64 >= threshold {
        unit += 1;
        threshold *= SIZE_BASE;
    }

    let value = bytes as f64 / SIZE_BASE.powi(unit as i32);
    let rounded = (value * 100.0).round() / 100.0;

    format!("{} {}", rounded, SIZE_UNITS[unit])
}

/// Format an upload timestamp as a calendar date.
pub fn format_uploaded_at(uploaded_at: &DateTime<Utc>) -> String {
    uploaded_at.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_size_zero() {
        assert_eq!(format_size(0), "0 Bytes");
    }

    #[test]
    fn test_format_size_unit_boundaries() {
        assert_eq!(format_size(1), "1 Bytes");
        assert_eq!(format_size(1023), "1023 Bytes");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1048576), "1 MB");
        assert_eq!(format_size(1073741824), "1 GB");
    }

    #[test]
    fn test_format_size_fractions() {
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(2048), "2 KB");
        assert_eq!(format_size(1234567), "1.18 MB");
    }

    #[test]
    fn test_format_size_caps_at_gigabytes() {
        assert_eq!(format_size(2 * 1024 * 1024 * 1024 * 1024), "2048 GB");
    }

    #[test]
    fn test_format_uploaded_at() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 0).unwrap();
        assert_eq!(format_uploaded_at(&at), "2024-03-09");
    }
}
