pub mod base;
pub mod snowflake;

#[cfg(test)]
pub mod mock;
