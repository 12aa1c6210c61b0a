mod end_criteria;
mod rng;
mod runner;
mod stats;
