mod batch;
mod player;
mod recording;
pub use batch::*;
pub use player::*;
pub use recording::*;
