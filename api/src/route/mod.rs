pub mod health;
pub mod reservation;
pub mod space;
pub mod user;
pub mod v1;
