//! Welch's t-test
//!
//! Two-sample significance testing with unequal variances assumed, plus the
//! pairwise lower-triangular matrix used for benchmark comparison. The
//! two-sided p-value comes from the Student t distribution evaluated through
//! the regularized incomplete beta function (continued-fraction form).

/// Result of a Welch two-sample test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WelchTest {
    /// The t statistic.
    pub t: f64,
    /// Welch-Satterthwaite degrees of freedom.
    pub df: f64,
    /// Two-sided p-value.
    pub p_value: f64,
}

/// Errors from significance testing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    /// Each side needs at least two samples for a variance estimate.
    #[error("need at least 2 samples per side, got {left} and {right}")]
    InsufficientSamples {
        /// Sample count of the left side.
        left: usize,
        /// Sample count of the right side.
        right: usize,
    },
}

/// Verdict for one pair of timing sample sets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PairVerdict {
    /// The difference is not statistically significant (p >= alpha).
    Indistinguishable {
        /// The two-sided p-value.
        p_value: f64,
    },
    /// Significant difference; the mean-timing ratio is reported.
    Distinct {
        /// The two-sided p-value.
        p_value: f64,
        /// Mean of the row entry divided by mean of the column entry.
        ratio: f64,
    },
}

/// Lower-triangular matrix of pairwise verdicts, keyed by entry index.
#[derive(Debug, Clone)]
pub struct PairwiseMatrix {
    /// Entry names in input order.
    pub names: Vec<String>,
    /// Significance threshold used.
    pub alpha: f64,
    /// `cells[i][j]` holds the verdict for pair `(i, j)` with `j < i`;
    /// `None` when the pair could not be tested.
    pub cells: Vec<Vec<Option<PairVerdict>>>,
}

fn moments(samples: &[f64]) -> (f64, f64, f64) {
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, variance, n)
}

/// Welch's t-test over two sample sets.
///
/// The zero-variance edge case (both sides constant) degenerates to p = 1
/// for equal means and p = 0 otherwise.
pub fn welch_t_test(a: &[f64], b: &[f64]) -> Result<WelchTest, StatsError> {
    if a.len() < 2 || b.len() < 2 {
        return Err(StatsError::InsufficientSamples {
            left: a.len(),
            right: b.len(),
        });
    }

    let (mean_a, var_a, n_a) = moments(a);
    let (mean_b, var_b, n_b) = moments(b);

    let se2 = var_a / n_a + var_b / n_b;
    if se2 <= 0.0 {
        let equal = (mean_a - mean_b).abs() < f64::EPSILON;
        return Ok(WelchTest {
            t: if equal {
                0.0
            } else {
                (mean_a - mean_b).signum() * f64::INFINITY
            },
            df: n_a + n_b - 2.0,
            p_value: if equal { 1.0 } else { 0.0 },
        });
    }

    let t = (mean_a - mean_b) / se2.sqrt();
    let df = se2 * se2
        / ((var_a / n_a).powi(2) / (n_a - 1.0) + (var_b / n_b).powi(2) / (n_b - 1.0));

    Ok(WelchTest {
        t,
        df,
        p_value: student_t_two_sided_p(t, df),
    })
}

/// Two-sided p-value for a Student t statistic with `df` degrees of freedom.
pub fn student_t_two_sided_p(t: f64, df: f64) -> f64 {
    if !t.is_finite() {
        return 0.0;
    }
    let x = df / (df + t * t);
    regularized_inc_beta(df / 2.0, 0.5, x)
}

/// Pairwise Welch tests over `cases`, producing the lower-triangular matrix.
pub fn pairwise_welch(cases: &[(&str, &[f64])], alpha: f64) -> PairwiseMatrix {
    let names: Vec<String> = cases.iter().map(|(name, _)| name.to_string()).collect();
    let mut cells = Vec::with_capacity(cases.len());

    for (i, (_, row_samples)) in cases.iter().enumerate() {
        let mut row = Vec::with_capacity(i);
        for (_, col_samples) in cases.iter().take(i) {
            let verdict = welch_t_test(row_samples, col_samples).ok().map(|test| {
                if test.p_value >= alpha {
                    PairVerdict::Indistinguishable {
                        p_value: test.p_value,
                    }
                } else {
                    let (row_mean, _, _) = moments(row_samples);
                    let (col_mean, _, _) = moments(col_samples);
                    PairVerdict::Distinct {
                        p_value: test.p_value,
                        ratio: row_mean / col_mean,
                    }
                }
            });
            row.push(verdict);
        }
        cells.push(row);
    }

    PairwiseMatrix {
        names,
        alpha,
        cells,
    }
}

// Incomplete beta machinery

/// Lanczos approximation to ln Γ(x), g = 7, 9 coefficients.
fn ln_gamma(x: f64) -> f64 {
    const COEF: [f64; 9] = [
        0.999_999_999_999_809_93,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_13,
        -176.615_029_162_140_59,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_571_6e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        // Reflection formula
        let pi = std::f64::consts::PI;
        pi.ln() - (pi * x).sin().ln() - ln_gamma(1.0 - x)
    } else {
        let x = x - 1.0;
        let t = x + 7.5;
        let mut acc = COEF[0];
        for (i, &c) in COEF.iter().enumerate().skip(1) {
            acc += c / (x + i as f64);
        }
        0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + acc.ln()
    }
}

/// Continued fraction for the incomplete beta function, modified Lentz.
fn betacf(a: f64, b: f64, x: f64) -> f64 {
    const MAX_ITER: usize = 200;
    const EPS: f64 = 3.0e-14;
    const FPMIN: f64 = 1.0e-300;

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < FPMIN {
        d = FPMIN;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=MAX_ITER {
        let m = m as f64;
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < FPMIN {
            d = FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < FPMIN {
            c = FPMIN;
        }
        d = 1.0 / d;
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < FPMIN {
            d = FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < FPMIN {
            c = FPMIN;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;

        if (del - 1.0).abs() < EPS {
            break;
        }
    }

    h
}

/// Regularized incomplete beta function I_x(a, b).
fn regularized_inc_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let ln_front =
        ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();

    // The continued fraction converges fast only below the split point;
    // above it, use the symmetry I_x(a,b) = 1 - I_{1-x}(b,a).
    if x < (a + 1.0) / (a + b + 2.0) {
        front * betacf(a, b, x) / a
    } else {
        1.0 - front * betacf(b, a, 1.0 - x) / b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ln_gamma_known_values() {
        // Γ(5) = 24, Γ(0.5) = sqrt(pi)
        assert!((ln_gamma(5.0) - 24.0f64.ln()).abs() < 1e-10);
        assert!((ln_gamma(0.5) - std::f64::consts::PI.sqrt().ln()).abs() < 1e-10);
    }

    #[test]
    fn test_inc_beta_bounds() {
        assert_eq!(regularized_inc_beta(2.0, 3.0, 0.0), 0.0);
        assert_eq!(regularized_inc_beta(2.0, 3.0, 1.0), 1.0);
        // I_x(1, 1) is the identity
        assert!((regularized_inc_beta(1.0, 1.0, 0.25) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_p_value_known_quantile() {
        // Standard t table: two-sided p = 0.05 at t = 2.228, df = 10
        let p = student_t_two_sided_p(2.228, 10.0);
        assert!((p - 0.05).abs() < 0.001, "p = {p}");
    }

    #[test]
    fn test_p_value_zero_t() {
        assert!((student_t_two_sided_p(0.0, 5.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_p_value_large_t() {
        assert!(student_t_two_sided_p(50.0, 10.0) < 1e-6);
    }

    #[test]
    fn test_identical_distributions_not_significant() {
        let a = [100.0, 102.0, 98.0, 101.0, 99.0, 100.0];
        let test = welch_t_test(&a, &a).unwrap();
        assert!((test.t - 0.0).abs() < 1e-12);
        assert!((test.p_value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_separated_distributions_significant() {
        let a = [100.0, 102.0, 98.0, 101.0, 99.0, 100.0];
        let b = [200.0, 202.0, 198.0, 201.0, 199.0, 200.0];
        let test = welch_t_test(&a, &b).unwrap();
        assert!(test.t < 0.0);
        assert!(test.p_value < 1e-6);
    }

    #[test]
    fn test_insufficient_samples() {
        assert_eq!(
            welch_t_test(&[1.0], &[1.0, 2.0]),
            Err(StatsError::InsufficientSamples { left: 1, right: 2 })
        );
    }

    #[test]
    fn test_zero_variance_edge_cases() {
        let same = welch_t_test(&[5.0, 5.0, 5.0], &[5.0, 5.0]).unwrap();
        assert_eq!(same.p_value, 1.0);

        let different = welch_t_test(&[5.0, 5.0, 5.0], &[6.0, 6.0]).unwrap();
        assert_eq!(different.p_value, 0.0);
    }

    #[test]
    fn test_pairwise_matrix_shape_and_verdicts() {
        let fast: Vec<f64> = vec![100.0, 101.0, 99.0, 100.0, 102.0, 98.0];
        let fast_too: Vec<f64> = vec![100.5, 100.0, 99.5, 101.0, 99.0, 100.0];
        let slow: Vec<f64> = vec![200.0, 201.0, 199.0, 200.0, 202.0, 198.0];

        let matrix = pairwise_welch(
            &[
                ("fast", fast.as_slice()),
                ("fast_too", fast_too.as_slice()),
                ("slow", slow.as_slice()),
            ],
            0.05,
        );

        // Lower-triangular shape
        assert_eq!(matrix.cells.len(), 3);
        assert_eq!(matrix.cells[0].len(), 0);
        assert_eq!(matrix.cells[1].len(), 1);
        assert_eq!(matrix.cells[2].len(), 2);

        assert!(matches!(
            matrix.cells[1][0],
            Some(PairVerdict::Indistinguishable { .. })
        ));
        match matrix.cells[2][0] {
            Some(PairVerdict::Distinct { ratio, p_value }) => {
                assert!((ratio - 2.0).abs() < 0.05);
                assert!(p_value < 0.05);
            }
            other => panic!("expected distinct verdict, got {other:?}"),
        }
    }
}
