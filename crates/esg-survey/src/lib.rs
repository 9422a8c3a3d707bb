pub mod config;
pub mod error;
pub mod gateway;
pub mod narrative;
pub mod survey;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;
