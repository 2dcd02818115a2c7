//! # dino_runner
//!
//! A side-scrolling runner played with your body.  A camera watches the
//! player; [`pose_gesture`] turns their pose into jump / duck / restart
//! inputs, and the game loop polls those once per tick.
//!
//! ## Controls
//!
//! | Pose | Game |
//! |---|---|
//! | Head above the green line | Jump (hold for a higher jump) |
//! | Head below the red line | Duck (fast-fall while airborne) |
//! | Hand above the magenta line, after a crash | Restart |
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Pose |
//! |---|---|
//! | `Up` / `Space` | Lean up |
//! | `Down` | Crouch |
//! | `H` | Raise hand |
//! | `P` | Step out of view / back in |
//! | `R` | Restart after a crash |
//! | `Q` / `Escape` | Quit |

pub mod config;
pub mod rect;
pub mod avatar;
pub mod obstacles;
pub mod world;
pub mod visualizer;
pub mod app;

#[cfg(test)]
mod testing;

pub use config::{GameConfig, RunnerError};
pub use world::{TickOutcome, World};
