pub mod authz;
pub mod categories;
pub mod error;
pub mod health;
pub mod news;
pub mod pages;
pub mod upgrade;
pub mod write;

pub use error::AppError;
