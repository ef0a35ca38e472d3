//! Fixed-step time integrators
//!
//! Provides the classical four-stage Runge–Kutta step for generic
//! first-order ODE state and the velocity-Verlet update used by
//! `Particle::integrate`

use std::ops::{Add, Mul};

use super::math::{Real, Vec3};

/// Advance `initial` by one RK4 step of size `dt`
///
/// `func(y, t)` is the derivative of the state. The state type only needs
/// value-copy, addition, and scaling, so the same function covers `Real`,
/// `Vec2`, `Vec3`, and the tagged `VecN`. The caller keeps ownership of its
/// state; `dt` may be negative for backward integration, and a NaN produced
/// by `func` propagates unchanged
pub fn runge_kutta4<S, F>(func: F, initial: S, t: Real, dt: Real) -> S
where
    S: Copy + Add<Output = S> + Mul<Real, Output = S>,
    F: Fn(S, Real) -> S,
{
    let half_dt = 0.5 * dt;

    // Four stage derivatives:
    // k1 at the start of the step
    let k1 = func(initial, t);
    // k2 and k3 at the midpoint, each seeded by the previous stage
    let k2 = func(initial + k1 * half_dt, t + half_dt);
    let k3 = func(initial + k2 * half_dt, t + half_dt);
    // k4 at the end of the step
    let k4 = func(initial + k3 * dt, t + dt);

    // Weighted combination: y + (dt/6)(k1 + 2 k2 + 2 k3 + k4)
    initial + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0)
}

/// One in-place velocity-Verlet step under constant acceleration
///
/// x' = x + v dt + a dt^2 / 2
/// v' = v + a dt      (a is taken as constant across the step)
pub fn verlet_step(x: &mut Vec3, v: &mut Vec3, a: Vec3, dt: Real) {
    *x += *v * dt + a * (0.5 * dt * dt);
    *v += a * dt;
}
