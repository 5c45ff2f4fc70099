#[cfg(test)]
pub mod mock;
pub mod users;
