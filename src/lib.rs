pub mod build;
pub mod card;
pub mod combos;
pub mod rng;
pub mod state;
