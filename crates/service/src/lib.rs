pub mod errors;
pub mod store;
