// src/utils/app_time.rs

pub type AppInstant = std::time::Instant;

pub fn now() -> AppInstant {
    std::time::Instant::now()
}

/// Milliseconds elapsed since `start`, for diagnostics.
pub fn elapsed_ms(start: AppInstant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
