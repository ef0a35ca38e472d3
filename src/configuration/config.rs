//! Configuration types for loading simulation scenarios from YAML
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`WorldConfig`]      – contact buffer capacity and resolver iterations
//! - [`ParametersConfig`] – step size, end time, report cadence
//! - [`ParticleConfig`]   – initial state for each particle
//! - [`ForceConfig`]      – force generator bindings, by particle name
//! - [`LinkConfig`]       – cable/rod links, by particle name
//! - [`ScenarioConfig`]   – top-level wrapper used to load from YAML
//!
//! # YAML format
//! An example scenario YAML matching these types:
//!
//! ```yaml
//! world:
//!   max_contacts: 16
//!   iterations: 0          # 0 -> 2 x used contacts, chosen per step
//!
//! parameters:
//!   t_end: 10.0            # total simulated time [s]
//!   h0: 0.01               # fixed step size [s]
//!   report_every: 100      # steps between state reports
//!
//! particles:
//!   - name: ball
//!     pos: [0.0, 100.0, 0.0]
//!     vel: [0.0, 0.0, 0.0]
//!     mass: 10.0           # or `immovable: true`
//!     damping: 1.0
//!
//! forces:
//!   - type: earth_gravity
//!     g: [0.0, -9.81, 0.0]
//!     applies_to: [ball]
//!
//! universal_gravity: []    # particle names under pairwise self-gravity
//!
//! ground:
//!   restitution: 0.9
//!
//! links: []
//! ```

use serde::Deserialize;

/// World-level knobs: buffer capacity and resolver iteration policy
#[derive(Deserialize, Debug)]
pub struct WorldConfig {
    pub max_contacts: usize, // contact buffer capacity, allocated once
    pub iterations: usize, // resolver passes; 0 = derive from used contacts
}

/// Numerical parameters for the run
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub t_end: f64, // total simulated time
    pub h0: f64, // fixed step size
    #[serde(default)]
    pub report_every: u32, // steps between state reports
}

/// Initial state for a single particle
#[derive(Deserialize, Debug)]
pub struct ParticleConfig {
    pub name: String,
    pub pos: Vec<f64>, // position, three components
    pub vel: Vec<f64>, // velocity, three components
    #[serde(default)]
    pub mass: Option<f64>, // finite mass [kg]; omit together with...
    #[serde(default)]
    pub immovable: bool, // ...this flag for the default mass of 1
    #[serde(default = "default_damping")]
    pub damping: f64,
}

fn default_damping() -> f64 {
    1.0
}

/// A force generator binding, dispatched on `type`
#[derive(Deserialize, Debug)]
#[serde(tag = "type")]
pub enum ForceConfig {
    #[serde(rename = "earth_gravity")] // uniform field g applied to each named particle
    EarthGravity { g: Vec<f64>, applies_to: Vec<String> },

    #[serde(rename = "point_gravity")] // inverse-square pull toward a fixed source mass
    PointGravity { origin: Vec<f64>, mass: f64, applies_to: Vec<String> },

    #[serde(rename = "drag")] // k1 |v| + k2 |v|^2 opposing motion
    Drag { k1: f64, k2: f64, applies_to: Vec<String> },

    #[serde(rename = "uplift")] // unit upward force inside an x-z disc
    Uplift { origin: Vec<f64>, radius: f64, applies_to: Vec<String> },

    #[serde(rename = "spring")] // two-particle spring acting on `on`
    Spring { on: String, other: String, spring_constant: f64, rest_length: f64 },

    #[serde(rename = "anchored_spring")] // spring to a fixed anchor with an elastic limit
    AnchoredSpring {
        anchor: Vec<f64>,
        spring_constant: f64,
        rest_length: f64,
        elastic_limit: f64,
        applies_to: Vec<String>,
    },

    #[serde(rename = "bungee")] // one-sided spring acting on `on`
    Bungee { on: String, other: String, spring_constant: f64, rest_length: f64 },
}

/// A particle link, dispatched on `type`
#[derive(Deserialize, Debug)]
#[serde(tag = "type")]
pub enum LinkConfig {
    #[serde(rename = "cable")]
    Cable { between: [String; 2], max_length: f64, restitution: f64 },

    #[serde(rename = "rod")]
    Rod { between: [String; 2], length: f64 },
}

/// Ground plane at y = 0 checked against every particle
#[derive(Deserialize, Debug)]
pub struct GroundConfig {
    pub restitution: f64,
}

/// Top-level scenario configuration loaded from YAML
#[derive(Deserialize, Debug)]
pub struct ScenarioConfig {
    pub world: WorldConfig,
    pub parameters: ParametersConfig,
    pub particles: Vec<ParticleConfig>,
    #[serde(default)]
    pub forces: Vec<ForceConfig>,
    #[serde(default)]
    pub universal_gravity: Vec<String>, // names under pairwise self-gravity
    #[serde(default)]
    pub ground: Option<GroundConfig>,
    #[serde(default)]
    pub links: Vec<LinkConfig>,
}
