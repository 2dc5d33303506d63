use chrono::DateTime;

/// Axis and tooltip timestamp format (UTC)
pub const AXIS_TIME_FORMAT: &str = "%m-%d %H:%M";

/// Format an epoch-ms timestamp for axis labels and tooltips (UTC).
pub fn epoch_ms_to_axis_label(epoch_ms: i64) -> String {
    match DateTime::from_timestamp_millis(epoch_ms) {
        Some(dt) => dt.format(AXIS_TIME_FORMAT).to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_epoch() {
        assert_eq!(epoch_ms_to_axis_label(13 * 60 * 60 * 1000), "01-01 13:00");
        assert_eq!(epoch_ms_to_axis_label(i64::MAX), "");
    }
}
