pub mod auth;

pub use auth::Gates;
