//! Human-readable byte sizes for image cards.

/// Unit suffixes, one per power of 1024.
///
/// Extends through EB so every `u64` has a unit.
pub const SIZE_UNITS: &[&str] = &["Bytes", "KB", "MB", "GB", "TB", "PB", "EB"];

const UNIT_BASE: u64 = 1024;

/// Format a byte count using binary units and at most two decimals.
///
/// Trailing zeros are dropped: 1024 bytes is `"1 KB"`, 1500 bytes is `"1.46 KB"`.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let magnitude = (bytes.ilog(UNIT_BASE) as usize).min(SIZE_UNITS.len() - 1);
    let value = bytes as f64 / (UNIT_BASE as f64).powi(magnitude as i32);
    let rounded = (value * 100.0).round() / 100.0;

    format!("{} {}", rounded, SIZE_UNITS[magnitude])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_bytes() {
        assert_eq!(format_size(0), "0 Bytes");
    }

    #[test]
    fn test_small_values_stay_in_bytes() {
        assert_eq!(format_size(1), "1 Bytes");
        assert_eq!(format_size(1023), "1023 Bytes");
    }

    #[test]
    fn test_whole_units_have_no_decimals() {
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(2048), "2 KB");
        assert_eq!(format_size(1024 * 1024), "1 MB");
        assert_eq!(format_size(1024 * 1024 * 1024), "1 GB");
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        assert_eq!(format_size(1500), "1.46 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024 + 300 * 1024), "5.29 MB");
    }

    #[test]
    fn test_beyond_gigabytes() {
        assert_eq!(format_size(1024u64.pow(4)), "1 TB");
        assert_eq!(format_size(1024u64.pow(5)), "1 PB");
        assert_eq!(format_size(u64::MAX), "16 EB");
    }
}
