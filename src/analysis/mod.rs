// Band statistics and proximity conditions
pub mod band_calculator;
pub mod proximity;

// Re-export commonly used functions
pub use band_calculator::compute_bands;
pub use proximity::detect_markers;
