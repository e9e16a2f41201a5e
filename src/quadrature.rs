//! Adaptive Gauss-Kronrod integration over a finite interval.
//!
//! Each subinterval is evaluated with the 7-point Gauss rule embedded in the
//! 15-point Kronrod rule. The raw difference `|K15 - G7|` is the error
//! estimate, with no further scaling. The subinterval with the largest error is bisected until the
//! summed error meets `max(abs, rel * |integral|)` or the subdivision limit
//! is hit. Endpoints are never evaluated, so integrands may be singular
//! (but integrable) there.

use thiserror::Error;

use crate::constants::{QUAD_ABS_TOLERANCE, QUAD_REL_TOLERANCE, QUAD_SUBDIVISION_LIMIT};

/// Kronrod abscissae on [-1, 1] (positive half, descending). Odd indices are
/// the Gauss abscissae; the last entry is the center.
const XGK: [f64; 8] = [
    0.991_455_371_120_812_639_206_854_697_526_329,
    0.949_107_912_342_758_524_526_189_684_047_851,
    0.864_864_423_359_769_072_789_712_788_640_926,
    0.741_531_185_599_394_439_863_864_773_280_788,
    0.586_087_235_467_691_130_294_144_845_693_013,
    0.405_845_151_377_397_166_906_606_412_076_961,
    0.207_784_955_007_898_467_600_689_403_773_245,
    0.0,
];

/// Kronrod weights, aligned with `XGK`.
const WGK: [f64; 8] = [
    0.022_935_322_010_529_224_963_732_008_058_970,
    0.063_092_092_629_978_553_290_700_663_189_204,
    0.104_790_010_322_250_183_839_876_322_541_518,
    0.140_653_259_715_525_918_745_189_590_510_238,
    0.169_004_726_639_267_902_826_583_426_598_550,
    0.190_350_578_064_785_409_913_256_402_421_014,
    0.204_432_940_075_298_892_414_161_999_234_649,
    0.209_482_141_084_727_828_012_999_174_891_714,
];

/// Gauss weights for `XGK[1]`, `XGK[3]`, `XGK[5]` and the center.
const WG: [f64; 4] = [
    0.129_484_966_168_869_693_270_611_432_679_082,
    0.279_705_391_489_276_667_901_467_771_423_780,
    0.381_830_050_505_118_944_950_369_775_488_975,
    0.417_959_183_673_469_387_755_102_040_816_327,
];

#[derive(Debug, Error, Clone, PartialEq)]
pub enum QuadratureError {
    #[error("invalid integration interval [{lower}, {upper}]")]
    InvalidInterval { lower: f64, upper: f64 },

    #[error("integrand is not finite at x = {x}")]
    NonFinite { x: f64 },

    #[error("no convergence within {limit} subintervals (estimated error {error:e})")]
    SubdivisionLimit { limit: usize, error: f64 },
}

/// Stopping criteria for [`integrate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance {
    pub abs: f64,
    pub rel: f64,
    pub limit: usize,
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance {
            abs: QUAD_ABS_TOLERANCE,
            rel: QUAD_REL_TOLERANCE,
            limit: QUAD_SUBDIVISION_LIMIT,
        }
    }
}

/// Result of a converged integration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Estimate {
    pub value: f64,
    pub error: f64,
    pub intervals: usize,
}

#[derive(Clone, Copy, Debug)]
struct Segment {
    lower: f64,
    upper: f64,
    value: f64,
    error: f64,
}

/// Integrate `f` over `[lower, upper]`.
pub fn integrate<F>(
    f: F,
    lower: f64,
    upper: f64,
    tolerance: Tolerance,
) -> Result<Estimate, QuadratureError>
where
    F: Fn(f64) -> f64,
{
    integrate_with_breakpoints(f, lower, upper, &[], tolerance)
}

/// Integrate `f` over `[lower, upper]`, starting from subintervals split at
/// `breakpoints`.
///
/// Breakpoints outside the open interval are ignored. Placing one where the
/// integrand is sharply peaked keeps the first Kronrod pass from stepping
/// over the peak.
pub fn integrate_with_breakpoints<F>(
    f: F,
    lower: f64,
    upper: f64,
    breakpoints: &[f64],
    tolerance: Tolerance,
) -> Result<Estimate, QuadratureError>
where
    F: Fn(f64) -> f64,
{
    if !(lower.is_finite() && upper.is_finite() && lower < upper) {
        return Err(QuadratureError::InvalidInterval { lower, upper });
    }

    let mut edges: Vec<f64> = breakpoints
        .iter()
        .copied()
        .filter(|&x| x > lower && x < upper)
        .collect();
    edges.sort_by(f64::total_cmp);
    edges.dedup();
    edges.insert(0, lower);
    edges.push(upper);

    let mut segments = Vec::with_capacity(tolerance.limit.max(edges.len()));
    for pair in edges.windows(2) {
        segments.push(kronrod15(&f, pair[0], pair[1])?);
    }

    loop {
        let value: f64 = segments.iter().map(|s| s.value).sum();
        let error: f64 = segments.iter().map(|s| s.error).sum();

        if error <= tolerance.abs.max(tolerance.rel * value.abs()) {
            return Ok(Estimate {
                value,
                error,
                intervals: segments.len(),
            });
        }
        if segments.len() >= tolerance.limit {
            return Err(QuadratureError::SubdivisionLimit {
                limit: tolerance.limit,
                error,
            });
        }

        let worst = segments
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.error.total_cmp(&b.error))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let segment = segments.swap_remove(worst);

        let mid = 0.5 * (segment.lower + segment.upper);
        if mid <= segment.lower || mid >= segment.upper {
            // Interval can no longer be split in floating point
            return Err(QuadratureError::SubdivisionLimit {
                limit: segments.len() + 1,
                error,
            });
        }
        segments.push(kronrod15(&f, segment.lower, mid)?);
        segments.push(kronrod15(&f, mid, segment.upper)?);
    }
}

fn kronrod15<F>(f: &F, lower: f64, upper: f64) -> Result<Segment, QuadratureError>
where
    F: Fn(f64) -> f64,
{
    let center = 0.5 * (lower + upper);
    let half = 0.5 * (upper - lower);

    let eval = |x: f64| {
        let y = f(x);
        if y.is_finite() {
            Ok(y)
        } else {
            Err(QuadratureError::NonFinite { x })
        }
    };

    let fc = eval(center)?;
    let mut kronrod = fc * WGK[7];
    let mut gauss = fc * WG[3];

    for j in 0..7 {
        let dx = half * XGK[j];
        let pair = eval(center - dx)? + eval(center + dx)?;
        kronrod += WGK[j] * pair;
        if j % 2 == 1 {
            gauss += WG[j / 2] * pair;
        }
    }

    Ok(Segment {
        lower,
        upper,
        value: kronrod * half,
        error: ((kronrod - gauss) * half).abs(),
    })
}
