pub use cell::*;
pub use dataset::*;
pub use engine::*;
pub use errors::*;
pub use grid::*;
pub use heuristic::*;
pub use partition::*;
pub use policy::*;
pub use score::*;
pub use visualization::*;

#[cfg(test)]
mod arbitrary;
mod cell;
mod dataset;
mod engine;
mod errors;
mod grid;
mod heuristic;
mod partition;
mod policy;
mod score;
mod visualization;
