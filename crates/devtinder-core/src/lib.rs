pub mod actions;
pub mod config;
pub mod models;
pub mod reducer;
pub mod slices;
pub mod state;
pub mod store;
pub mod validation;

pub use actions::*;
pub use reducer::*;
pub use state::*;
