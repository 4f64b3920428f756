pub mod repository;
pub mod responder_config;
pub mod sources;
pub mod validation;

pub use repository::*;
pub use responder_config::*;
pub use sources::*;
pub use validation::*;
