pub mod context;
pub mod display;

#[cfg(test)]
pub mod fake;
