//! Common, shared types.

pub mod anim;
pub mod contact;
pub mod error;
pub mod layers;
pub mod messages;
pub mod rng;
pub mod sim_time;
pub mod state;
pub mod tier;
pub mod tunables;

#[cfg(test)]
pub mod test_utils;
