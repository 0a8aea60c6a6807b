use crate::model::{FramePacingSummary, IntensitySummary};

/// Compute mean, median, 25th percentile and 75th percentile from samples.
pub fn compute_metrics(samples: &[f64]) -> Option<(f64, f64, f64, f64)> {
    if samples.len() < 2 {
        return None;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    let median = sorted[n / 2];
    let p25 = sorted[n / 4];
    let p75 = sorted[3 * n / 4];
    Some((mean, median, p25, p75))
}

/// Summarize the fire intensity sampled on every cooking frame.
pub fn intensity_summary(samples: &[f64]) -> IntensitySummary {
    let metrics = compute_metrics(samples);
    IntensitySummary {
        samples: samples.len() as u64,
        mean: metrics.map(|(mean, _, _, _)| mean),
        median: metrics.map(|(_, median, _, _)| median),
        p25: metrics.map(|(_, _, p25, _)| p25),
        p75: metrics.map(|(_, _, _, p75)| p75),
    }
}

/// Summarize frame-to-frame intervals in milliseconds.
pub fn frame_pacing_summary(deltas_ms: &[f64]) -> FramePacingSummary {
    let metrics = compute_metrics(deltas_ms);
    FramePacingSummary {
        mean_ms: metrics.map(|(mean, _, _, _)| mean),
        median_ms: metrics.map(|(_, median, _, _)| median),
        p25_ms: metrics.map(|(_, _, p25, _)| p25),
        p75_ms: metrics.map(|(_, _, _, p75)| p75),
        max_ms: deltas_ms.iter().copied().reduce(f64::max),
    }
}
