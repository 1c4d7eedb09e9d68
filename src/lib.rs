pub mod diag;
pub mod location;
pub mod outcome;
pub mod parse;
pub mod sourcemap;
pub mod util;

pub use self::outcome::Outcome;
pub use self::parse::{analyze, tokenize};
