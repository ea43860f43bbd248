pub mod info;
pub mod prediction;
pub mod user_auth;
