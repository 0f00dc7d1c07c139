pub mod backend;
pub mod models;
pub mod vibe;

pub use backend::*;
pub use models::*;
pub use vibe::*;
