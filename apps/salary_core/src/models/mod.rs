pub mod prediction;
pub mod user;
