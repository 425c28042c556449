pub mod access;
pub mod app_state;
pub mod config;
pub mod errors;
pub mod models;
pub mod router;
pub mod services;
pub mod session;

#[cfg(test)]
pub mod test_utils;
