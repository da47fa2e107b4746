pub mod accounts;
pub mod availability;
pub mod credentials;
pub mod feed;
pub mod lifecycle;
