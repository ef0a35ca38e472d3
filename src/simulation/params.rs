//! Runtime parameters for a scenario run
//!
//! `Parameters` holds the fixed step size, the end time, and how often the
//! demo runner reports particle state

use super::math::Real;

#[derive(Debug, Clone)]
pub struct Parameters {
    pub t_end: Real, // total simulated time
    pub h0: Real, // fixed step size
    pub report_every: u32, // steps between state reports (0 = only at the end)
}
