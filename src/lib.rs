pub mod api;
pub mod cli;
pub mod collection;
pub mod config;
pub mod error;
pub mod output;
pub mod present;
pub mod session;
pub mod subtitle;
pub mod transport;
pub mod wbi;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
