mod duid;

pub use duid::*;
