use argminmax::ArgMinMax;

pub fn get_max(vec: &[f64]) -> f64 {
    let max_index: usize = vec.argmax();
    vec[max_index]
}

pub fn get_min(vec: &[f64]) -> f64 {
    let min_index: usize = vec.argmin();
    vec[min_index]
}

/// (min, max) of a slice, or None for an empty one.
pub fn get_min_max(vec: &[f64]) -> Option<(f64, f64)> {
    if vec.is_empty() {
        return None;
    }
    Some((get_min(vec), get_max(vec)))
}

/// Running mean / population variance accumulator (Welford).
///
/// Identical inputs leave the variance at exactly zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population variance (divisor n). Zero for a single value.
    pub fn population_variance(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        (self.m2 / self.count as f64).max(0.0)
    }

    pub fn population_std_dev(&self) -> f64 {
        self.population_variance().sqrt()
    }
}

impl FromIterator<f64> for RunningStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = RunningStats::new();
        for value in iter {
            stats.push(value);
        }
        stats
    }
}
