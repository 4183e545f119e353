//! Plane Dodge — a plane dodges birds and collects stars and parachutes
//! (fuel) while the clock runs.
//!
//! The library is pure game logic.  Rendering, input and sound live in the
//! binary and only talk to the library through [`session::GameSession`].

pub mod clock;
pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod pool;
pub mod session;
pub mod spawn;
