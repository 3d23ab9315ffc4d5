pub mod enricher;
pub mod parser;
pub mod report;
pub mod resolver;
pub mod stats;

#[cfg(test)]
pub mod test_support;
