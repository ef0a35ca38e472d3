//! Vector algebra and scalar policy for the engine
//!
//! Defines the `Real` scalar (f64 by default, f32 under the `f32` feature),
//! the nalgebra-backed `Vec2`/`Vec3` aliases, the near-zero helpers used
//! wherever "almost zero" appears in a contract, and the tagged `VecN`
//! value consumed by the dimension-agnostic RK4 path

use std::ops::{Add, Mul, Sub};

use nalgebra::{Vector2, Vector3};

/// Scalar type of the whole engine, chosen at build time
#[cfg(not(feature = "f32"))]
pub type Real = f64;
#[cfg(feature = "f32")]
pub type Real = f32;

/// Threshold below which a magnitude counts as zero
#[cfg(not(feature = "f32"))]
pub const EPSILON: Real = 1e-15;
#[cfg(feature = "f32")]
pub const EPSILON: Real = 1e-6;

/// Gravitational constant [m^3 kg^-1 s^-2]
pub const BIG_G: Real = 6.674_08e-11;

pub type Vec2 = Vector2<Real>;
pub type Vec3 = Vector3<Real>;

/// A vector is "zero" iff its magnitude is strictly below `EPSILON`
pub fn is_zero(v: &Vec3) -> bool {
    v.norm() < EPSILON
}

/// Unit vector in the direction of `v`, or the zero vector when `v` is
/// itself zero (never NaN, never a divide by zero)
pub fn normalize_or_zero(v: &Vec3) -> Vec3 {
    let mag = v.norm();
    if mag < EPSILON {
        Vec3::zeros()
    } else {
        v / mag
    }
}

/// Euclidean distance between two points
pub fn distance(a: &Vec3, b: &Vec3) -> Real {
    (a - b).norm()
}

/// Tagged 1/2/3-dimensional value for derivative functions that are not
/// inherently three-dimensional. Arithmetic is defined per-variant; mixing
/// variants is a programmer error
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VecN {
    Scalar(Real),
    Vec2(Vec2),
    Vec3(Vec3),
}

impl VecN {
    pub fn magnitude(&self) -> Real {
        match self {
            VecN::Scalar(s) => s.abs(),
            VecN::Vec2(v) => v.norm(),
            VecN::Vec3(v) => v.norm(),
        }
    }
}

impl Add for VecN {
    type Output = VecN;

    fn add(self, rhs: VecN) -> VecN {
        match (self, rhs) {
            (VecN::Scalar(a), VecN::Scalar(b)) => VecN::Scalar(a + b),
            (VecN::Vec2(a), VecN::Vec2(b)) => VecN::Vec2(a + b),
            (VecN::Vec3(a), VecN::Vec3(b)) => VecN::Vec3(a + b),
            _ => panic!("VecN dimension mismatch"),
        }
    }
}

impl Sub for VecN {
    type Output = VecN;

    fn sub(self, rhs: VecN) -> VecN {
        match (self, rhs) {
            (VecN::Scalar(a), VecN::Scalar(b)) => VecN::Scalar(a - b),
            (VecN::Vec2(a), VecN::Vec2(b)) => VecN::Vec2(a - b),
            (VecN::Vec3(a), VecN::Vec3(b)) => VecN::Vec3(a - b),
            _ => panic!("VecN dimension mismatch"),
        }
    }
}

impl Mul<Real> for VecN {
    type Output = VecN;

    fn mul(self, scalar: Real) -> VecN {
        match self {
            VecN::Scalar(s) => VecN::Scalar(s * scalar),
            VecN::Vec2(v) => VecN::Vec2(v * scalar),
            VecN::Vec3(v) => VecN::Vec3(v * scalar),
        }
    }
}
