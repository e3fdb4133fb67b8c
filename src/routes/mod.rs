pub mod baby;
pub mod error;
pub mod health;
pub mod milestone;
pub mod payment;
pub mod photo;
pub mod share;
pub mod shared;
pub mod user;
