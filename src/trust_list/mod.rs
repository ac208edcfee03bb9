// Trust list module - Downloading and parsing lists of trust lists

pub mod parser;

pub use parser::{TrustListParser, TslPointer};
