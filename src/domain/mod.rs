pub mod game;
pub mod position;
pub mod team;

pub use game::*;
pub use position::*;
pub use team::*;
