//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so release
//! builds remain quiet. Every use site is further gated by `cfg(debug_assertions)`.

/// Emit per-recompute timings and group counts from the band calculator.
pub const PRINT_BAND_COMPUTE: bool = false;

/// Emit which migration path a persisted band config took.
pub const PRINT_CONFIG_MIGRATION: bool = false;

/// Emit every registry create/remove and style mutation.
pub const PRINT_SERIES_LIFECYCLE: bool = false;

/// Emit indicator pane enable/teardown and marker counts.
pub const PRINT_INDICATOR_PANE: bool = false;

/// Emit how many queued inputs were coalesced before a reaction ran.
pub const PRINT_INPUT_QUEUE: bool = false;

/// Emit UI interaction logs (toggles, chart type switches, etc.).
pub const PRINT_UI_INTERACTIONS: bool = false;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_are_off_by_default() {
        let flags = [
            PRINT_BAND_COMPUTE,
            PRINT_CONFIG_MIGRATION,
            PRINT_SERIES_LIFECYCLE,
            PRINT_INDICATOR_PANE,
            PRINT_INPUT_QUEUE,
            PRINT_UI_INTERACTIONS,
        ];
        assert!(flags.iter().all(|flag| !flag));
    }
}
