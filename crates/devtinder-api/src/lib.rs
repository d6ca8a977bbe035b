pub mod client;
pub mod contracts;
pub mod error;
pub mod flows;
pub mod http;

pub use client::*;
pub use contracts::*;
pub use error::*;
pub use flows::*;
pub use http::*;
