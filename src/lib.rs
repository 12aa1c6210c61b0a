pub mod demo;
pub mod dist;
pub mod error;
pub mod export;
pub mod net;
pub mod rng;
pub mod runner;
pub mod sim;
pub mod stats;

pub use error::{Result, SimError};

#[cfg(test)]
mod test;
