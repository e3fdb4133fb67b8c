pub mod baby;
pub mod milestone;
pub mod payment;
pub mod photo;
pub mod postgres_repository;
pub mod session;
pub mod share_link;
pub mod user;
