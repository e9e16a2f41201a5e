/// Games in a regular professional basketball season
pub const SEASON_LENGTH: u32 = 82;

/// Default pseudo win-count of the Beta prior (uniform prior)
pub const DEFAULT_PRIOR_WINS: f64 = 1.0;

/// Default pseudo loss-count of the Beta prior (uniform prior)
pub const DEFAULT_PRIOR_LOSSES: f64 = 1.0;

/// Absolute error target for each per-outcome integral
pub const QUAD_ABS_TOLERANCE: f64 = 1e-10;

/// Relative error target for each per-outcome integral
pub const QUAD_REL_TOLERANCE: f64 = 1e-10;

/// Maximum number of subintervals the adaptive integrator may create
pub const QUAD_SUBDIVISION_LIMIT: usize = 200;

/// Allowed deviation of a distribution's total mass from 1
pub const MASS_TOLERANCE: f64 = 1e-6;

/// Deviation above which a computed mass is logged as suspicious
pub const MASS_WARN_THRESHOLD: f64 = 1e-8;

/// Upper bound of the likelihood axis in the comparison chart
pub const CHART_Y_MAX: f64 = 0.14;

/// Maximum number of doubling breakpoint rungs placed on each side of
/// the integrand's peak
pub const BREAKPOINT_RUNGS: usize = 48;
