//! Sky Battle: a side-scrolling arcade shooter simulation.
//!
//! The crate is the simulation core: entities, the fixed-tick level loop,
//! the three levels and the session that chains them. Rendering, audio and
//! input are collaborators; the `sky_battle` binary provides terminal ones.

pub mod actors;
pub mod boss;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod events;
pub mod levels;
pub mod session;
pub mod view;
