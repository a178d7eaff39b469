//! Transition models for small grid-worlds, built for model-based solvers
//! (value iteration, policy iteration) that live elsewhere.

pub mod envs;
pub mod error;
pub mod mdps;

pub use envs::{grid_map::*, grid_world::*, presets};
pub use error::{Error, Result};
pub use mdps::{mdp::*, mdp_simulator::*};

pub type Discrete = usize;
pub type Continous = f64;
