pub mod account;
pub mod registry;
pub mod types;

pub use account::Account;
pub use registry::AccountRegistry;
pub use types::{AccountKey, Amount, CardNumber, Pin};
