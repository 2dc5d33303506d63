//! config/demo.rs Demo basket knobs.
//!
//! The viewer ships with a deterministic synthetic basket so it can run
//! without any network access.

pub struct DemoConfig {
    /// Instruments generated for the demo basket
    pub instruments: &'static [&'static str],
    /// Candles generated per instrument
    pub candles_per_instrument: usize,
    /// Candle width in milliseconds
    pub interval_ms: i64,
    /// Timestamp of the first candle (ms since epoch)
    pub start_timestamp_ms: i64,
    /// Base price every instrument starts near
    pub base_price: f64,
}

pub const DEMO: DemoConfig = DemoConfig {
    instruments: &["BTCUSDT", "ETHUSDT", "SOLUSDT", "BNBUSDT", "PAXGUSDT"],
    candles_per_instrument: 400,
    interval_ms: 30 * 60 * 1000,
    // 2025-01-01T00:00:00Z
    start_timestamp_ms: 1_735_689_600_000,
    base_price: 100.0,
};
