pub mod database;
pub mod kv;
pub mod redis;
pub mod repository;
