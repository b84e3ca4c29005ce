pub mod domain;
pub mod error;
pub mod parser;
pub mod writer;

pub use domain::{Account, AccountKey, AccountRegistry, Amount};
pub use error::Error;
