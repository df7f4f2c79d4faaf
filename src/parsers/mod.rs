pub mod las;
pub mod types;

pub use las::Las;
pub use types::{finite_range, Curve, HeaderItem, LoadError, Parseable, WellLog};
