//! Physics pipeline
//!
//! Data flows one way each tick:
//! scheduler -> integrator (per body) -> detector (all pairs) -> resolver
//!
//! Single-threaded; a tick runs to completion before the next begins.

pub mod collision;
pub mod forces;
pub mod grid;
pub mod integrator;
pub mod resolve;
pub mod scene;
pub mod state;
pub mod tick;

pub use collision::{BlockRegion, Contact, ball_ball, ball_block, ball_wall, detect};
pub use forces::{ForceModel, aerodynamic_drag, gravity};
pub use grid::BlockGrid;
pub use integrator::{integrate, integrate_ball};
pub use resolve::{
    CorrectionSplit, NormalFrame, immovable_collision, linear_collision, resolve,
};
pub use scene::Scene;
pub use state::{Ball, Block, Body, BodyDesc, Wall};
pub use tick::{ResolutionPolicy, Simulation, TickStats, tick};
