pub mod baby;
pub mod milestone;
pub mod pagination;
pub mod payment;
pub mod photo;
pub mod session;
pub mod share_link;
pub mod user;
