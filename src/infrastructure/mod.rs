pub mod config;
pub mod db;
pub mod password;
pub mod repositories;
pub mod session;
pub mod state;
