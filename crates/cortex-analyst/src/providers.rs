pub mod base;
pub mod configs;
pub mod cortex;

#[cfg(test)]
pub mod mock;
