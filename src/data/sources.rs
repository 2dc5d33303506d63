//! Where OHLCV points come from.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};

use crate::config::demo::DemoConfig;
use crate::domain::{InstrumentId, OhlcvPoint};

pub trait PointSource {
    // Either produce a basket OR return an anyhow::error
    fn load_points(&self) -> Result<Vec<OhlcvPoint>>;

    /// A unique identifier for this implementation (so that afterwards we know which one we used).
    fn signature(&self) -> &'static str;
}

/// Try each source in order and return the first basket that loads.
pub fn load_first_available(sources: &[Box<dyn PointSource>]) -> Result<(Vec<OhlcvPoint>, &'static str)> {
    for source in sources {
        match source.load_points() {
            Ok(points) => return Ok((points, source.signature())),
            Err(e) => {
                log::info!("Point source '{}' failed: {:#}", source.signature(), e);
                // Continue to the next source
            }
        }
    }
    Err(anyhow!("All point sources failed to produce data"))
}

// ============================================================================
// JSON file
// ============================================================================

/// A JSON array of points (camelCase fields, `volume` optional).
pub struct JsonFileSource {
    pub path: PathBuf,
}

impl PointSource for JsonFileSource {
    fn signature(&self) -> &'static str {
        "JSON file"
    }

    fn load_points(&self) -> Result<Vec<OhlcvPoint>> {
        let file = File::open(&self.path)
            .context(format!("Failed to open points file: {:?}", self.path))?;
        let points: Vec<OhlcvPoint> = serde_json::from_reader(BufReader::new(file))
            .context(format!("Failed to parse points file: {:?}", self.path))?;
        if points.is_empty() {
            bail!("Points file {:?} is empty", self.path);
        }
        Ok(points)
    }
}

// ============================================================================
// Synthetic demo basket
// ============================================================================

/// Deterministic random-walk basket, identical on every run.
pub struct DemoSource {
    pub config: &'static DemoConfig,
}

impl PointSource for DemoSource {
    fn signature(&self) -> &'static str {
        "Demo basket"
    }

    fn load_points(&self) -> Result<Vec<OhlcvPoint>> {
        Ok(demo_basket(self.config))
    }
}

/// xorshift64*: small, seedable, good enough for chart noise
struct NoiseGen(u64);

impl NoiseGen {
    fn seeded(text: &str) -> Self {
        // FNV-1a over the name so each instrument walks differently
        let seed = text
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325u64, |h, b| (h ^ b as u64).wrapping_mul(0x0100_0000_01b3));
        Self(seed | 1)
    }

    /// Uniform in [-1, 1)
    fn next_signed(&mut self) -> f64 {
        self.0 ^= self.0 >> 12;
        self.0 ^= self.0 << 25;
        self.0 ^= self.0 >> 27;
        let bits = self.0.wrapping_mul(0x2545_f491_4f6c_dd1d) >> 11;
        (bits as f64 / (1u64 << 53) as f64) * 2.0 - 1.0
    }
}

pub fn demo_basket(config: &DemoConfig) -> Vec<OhlcvPoint> {
    let mut points = Vec::with_capacity(config.instruments.len() * config.candles_per_instrument);

    for (i, name) in config.instruments.iter().enumerate() {
        let id = InstrumentId::from(*name);
        let mut noise = NoiseGen::seeded(name);
        // Spread the instruments a little so the bands have something to measure
        let mut price = config.base_price * (1.0 + 0.02 * i as f64);

        for step in 0..config.candles_per_instrument {
            let timestamp_ms = config.start_timestamp_ms + step as i64 * config.interval_ms;
            let open = price;
            let drift = 0.004 * noise.next_signed();
            let close = (open * (1.0 + drift)).max(0.01);
            let wick = open.max(close) * 0.002 * noise.next_signed().abs();
            let high = open.max(close) + wick;
            let low = (open.min(close) - wick).max(0.001);
            let volume = 1_000.0 * (1.5 + noise.next_signed());

            points.push(OhlcvPoint {
                instrument_id: id.clone(),
                timestamp_ms,
                open,
                high,
                low,
                close,
                volume: Some(volume),
            });
            price = close;
        }
    }

    points
}
