//! Descriptive statistics over cycle time samples.

use serde::Serialize;

/// Summary statistics for a sample of cycle times (in days).
///
/// Spread and shape measures are `None` when the sample is too small to
/// define them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleStatistics {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub mode: f64,
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub q25: f64,
    pub q75: f64,
    pub iqr: f64,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
}

impl SampleStatistics {
    /// Computes statistics; returns `None` for an empty sample.
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let sorted = sorted(values);
        let q25 = quantile_sorted(&sorted, 0.25);
        let q75 = quantile_sorted(&sorted, 0.75);

        Some(Self {
            count: values.len(),
            mean: mean(values),
            median: quantile_sorted(&sorted, 0.5),
            mode: mode_sorted(&sorted),
            std: sample_std(values),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            q25,
            q75,
            iqr: q75 - q25,
            skewness: skewness(values),
            kurtosis: excess_kurtosis(values),
        })
    }
}

/// Arithmetic mean. Callers guarantee a non-empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (n - 1) as f64).sqrt())
}

/// Quantile with linear interpolation between the closest ranks.
///
/// `q` is clamped to `[0, 1]`; returns `None` for an empty sample.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(quantile_sorted(&sorted(values), q))
}

fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let q = q.clamp(0.0, 1.0);
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Most frequent value; ties resolve to the smallest.
fn mode_sorted(sorted: &[f64]) -> f64 {
    let mut best = sorted[0];
    let mut best_run = 0;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i;
        while j < sorted.len() && sorted[j] == sorted[i] {
            j += 1;
        }
        if j - i > best_run {
            best_run = j - i;
            best = sorted[i];
        }
        i = j;
    }
    best
}

/// Adjusted Fisher-Pearson skewness. Needs at least 3 values.
fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 3 {
        return None;
    }
    let nf = n as f64;
    let m = mean(values);
    let m2 = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / nf;
    if m2 == 0.0 {
        return Some(0.0);
    }
    let m3 = values.iter().map(|v| (v - m).powi(3)).sum::<f64>() / nf;
    let g1 = m3 / m2.powf(1.5);
    Some(g1 * (nf * (nf - 1.0)).sqrt() / (nf - 2.0))
}

/// Bias-corrected excess kurtosis (0 for a normal distribution). Needs at
/// least 4 values.
fn excess_kurtosis(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 4 {
        return None;
    }
    let nf = n as f64;
    let m = mean(values);
    let s2 = values.iter().map(|v| (v - m).powi(2)).sum::<f64>();
    if s2 == 0.0 {
        return Some(0.0);
    }
    let s4 = values.iter().map(|v| (v - m).powi(4)).sum::<f64>();
    let numerator = nf * (nf + 1.0) * (nf - 1.0) * s4;
    let denominator = (nf - 2.0) * (nf - 3.0) * s2 * s2;
    let adjustment = 3.0 * (nf - 1.0).powi(2) / ((nf - 2.0) * (nf - 3.0));
    Some(numerator / denominator - adjustment)
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_sample_has_no_statistics() {
        assert!(SampleStatistics::compute(&[]).is_none());
        assert!(quantile(&[], 0.5).is_none());
    }

    #[test]
    fn basic_statistics() {
        let stats = SampleStatistics::compute(&[4.0, 1.0, 3.0, 2.0, 2.0]).unwrap();

        assert_eq!(stats.count, 5);
        assert!(approx(stats.mean, 2.4));
        assert_eq!(stats.median, 2.0);
        assert_eq!(stats.mode, 2.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.q25, 2.0);
        assert_eq!(stats.q75, 3.0);
        assert_eq!(stats.iqr, 1.0);
        assert!(approx(stats.std.unwrap(), 1.140175425099138));
    }

    #[test]
    fn quantile_interpolates_linearly() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&values, 0.25), Some(1.75));
        assert_eq!(quantile(&values, 0.5), Some(2.5));
        assert_eq!(quantile(&values, 1.0), Some(4.0));
        assert_eq!(quantile(&values, 0.0), Some(1.0));
    }

    #[test]
    fn mode_prefers_smallest_on_tie() {
        let stats = SampleStatistics::compute(&[3.0, 1.0, 3.0, 1.0]).unwrap();
        assert_eq!(stats.mode, 1.0);
    }

    #[test]
    fn single_value_has_no_spread() {
        let stats = SampleStatistics::compute(&[5.0]).unwrap();
        assert_eq!(stats.std, None);
        assert_eq!(stats.skewness, None);
        assert_eq!(stats.kurtosis, None);
        assert_eq!(stats.median, 5.0);
    }

    #[test]
    fn symmetric_sample_has_zero_skew() {
        let stats = SampleStatistics::compute(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!(approx(stats.skewness.unwrap(), 0.0));
        assert!(approx(stats.kurtosis.unwrap(), -1.2));
    }

    #[test]
    fn right_tail_is_positively_skewed() {
        let stats = SampleStatistics::compute(&[1.0, 1.0, 2.0, 2.0, 3.0, 30.0]).unwrap();
        assert!(stats.skewness.unwrap() > 1.0);
    }

    #[test]
    fn constant_sample_has_zero_shape() {
        let stats = SampleStatistics::compute(&[2.0; 6]).unwrap();
        assert_eq!(stats.std, Some(0.0));
        assert_eq!(stats.skewness, Some(0.0));
        assert_eq!(stats.kurtosis, Some(0.0));
    }
}
