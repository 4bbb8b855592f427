pub mod db;
pub mod errors;
pub mod record;
pub mod user;

#[cfg(test)]
mod tests;
