pub mod auth;
pub mod reservation;
pub mod space;
pub mod user;
