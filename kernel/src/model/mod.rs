pub mod auth;
pub mod id;
pub mod reservation;
pub mod role;
pub mod space;
pub mod user;
