pub mod errors;
pub mod session;
pub mod settings;
pub mod store;
pub mod types;
pub mod utils;
