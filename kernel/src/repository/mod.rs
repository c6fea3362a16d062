pub mod auth;
pub mod health;
pub mod reservation;
pub mod space;
pub mod user;
