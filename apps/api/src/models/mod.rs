pub mod cv;

#[cfg(test)]
pub mod fixtures;
