#![forbid(unsafe_code)]

pub mod import;
pub mod repository;
pub mod sqlite;
