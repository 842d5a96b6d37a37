pub mod drag;
pub mod error;
pub mod geometry;
pub mod manager;
pub mod settings;
pub mod surrogate;
