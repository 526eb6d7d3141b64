//! Statistical primitives for the metrics engine.
//!
//! These are deliberately public: when a ratio in the final report comes out
//! as 0.0, a caller (or a test) can inspect the denominator here to tell a
//! degenerate "no signal" result apart from a genuinely zero ratio.

/// Arithmetic mean. 0.0 for an empty slice.
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Sample variance (n - 1 denominator). 0.0 with fewer than two observations.
pub fn sample_variance(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let m = mean(xs);
    xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (xs.len() - 1) as f64
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std(xs: &[f64]) -> f64 {
    sample_variance(xs).sqrt()
}

/// Population standard deviation of the strictly negative observations,
/// about their own mean. 0.0 when there are no negative observations; the
/// caller treats that as a degenerate (undefined) downside risk.
pub fn downside_deviation(xs: &[f64]) -> f64 {
    let negatives: Vec<f64> = xs.iter().copied().filter(|x| *x < 0.0).collect();
    if negatives.is_empty() {
        return 0.0;
    }
    let m = mean(&negatives);
    let variance =
        negatives.iter().map(|x| (x - m).powi(2)).sum::<f64>() / negatives.len() as f64;
    variance.sqrt()
}

/// Sample covariance (n - 1 denominator). 0.0 on length mismatch or fewer
/// than two observations.
pub fn sample_covariance(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.len() < 2 {
        return 0.0;
    }
    let mx = mean(xs);
    let my = mean(ys);
    xs.iter()
        .zip(ys)
        .map(|(x, y)| (x - mx) * (y - my))
        .sum::<f64>()
        / (xs.len() - 1) as f64
}

/// Historical percentile with linear interpolation between order statistics:
/// rank h = (p / 100) * (n - 1) over the sorted observations.
///
/// The result always lies within [min(xs), max(xs)]. 0.0 for an empty slice.
pub fn percentile(xs: &[f64], p: f64) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = rank - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

/// Fisher-Pearson skewness: the third standardized moment m3 / m2^(3/2)
/// over population moments. 0.0 with fewer than three observations or zero
/// variance.
pub fn skewness(xs: &[f64]) -> f64 {
    if xs.len() < 3 {
        return 0.0;
    }
    let n = xs.len() as f64;
    let m = mean(xs);
    let m2 = xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / n;
    if m2 <= 0.0 {
        return 0.0;
    }
    let m3 = xs.iter().map(|x| (x - m).powi(3)).sum::<f64>() / n;
    m3 / m2.powf(1.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn sample_std_uses_n_minus_one() {
        // Variance of [2, 4, 4, 4, 5, 5, 7, 9] about mean 5 is 32/7 (sample).
        let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((sample_variance(&xs) - 32.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn sample_std_of_singleton_is_zero() {
        assert_eq!(sample_std(&[0.1]), 0.0);
    }

    #[test]
    fn downside_deviation_ignores_gains() {
        // Only -0.02 and -0.04 count; their mean is -0.03, population std 0.01.
        let xs = [0.05, -0.02, 0.03, -0.04, 0.01];
        assert!((downside_deviation(&xs) - 0.01).abs() < 1e-12);
    }

    #[test]
    fn downside_deviation_without_losses_is_zero() {
        assert_eq!(downside_deviation(&[0.01, 0.02, 0.0]), 0.0);
    }

    #[test]
    fn covariance_of_series_with_itself_is_its_variance() {
        let xs = [0.01, -0.02, 0.03, 0.005];
        assert!((sample_covariance(&xs, &xs) - sample_variance(&xs)).abs() < 1e-15);
    }

    #[test]
    fn percentile_interpolates_linearly() {
        let xs = [10.0, 20.0, 30.0, 40.0];
        // rank = 0.5 * 3 = 1.5 -> halfway between 20 and 30
        assert!((percentile(&xs, 50.0) - 25.0).abs() < 1e-12);
        // rank = 0.05 * 3 = 0.15 -> 10 + 0.15 * 10
        assert!((percentile(&xs, 5.0) - 11.5).abs() < 1e-12);
    }

    #[test]
    fn percentile_stays_within_observed_range() {
        let xs = [-0.06, 0.02, -0.01, 0.04, 0.0];
        let p5 = percentile(&xs, 5.0);
        assert!(p5 >= -0.06 && p5 <= 0.04);
        assert_eq!(percentile(&xs, 0.0), -0.06);
        assert_eq!(percentile(&xs, 100.0), 0.04);
    }

    #[test]
    fn skewness_of_symmetric_data_is_zero() {
        let xs = [-2.0, -1.0, 0.0, 1.0, 2.0];
        assert!(skewness(&xs).abs() < 1e-12);
    }

    #[test]
    fn skewness_sign_follows_the_long_tail() {
        assert!(skewness(&[0.0, 0.0, 0.0, 0.0, 10.0]) > 0.0);
        assert!(skewness(&[0.0, 0.0, 0.0, 0.0, -10.0]) < 0.0);
    }

    #[test]
    fn skewness_of_constant_data_is_zero() {
        assert_eq!(skewness(&[1.0, 1.0, 1.0, 1.0]), 0.0);
    }
}
