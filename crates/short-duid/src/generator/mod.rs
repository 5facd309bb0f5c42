mod basic;
mod interface;
mod lock;
mod mutex;
#[cfg(test)]
mod tests;
mod transition;

pub use basic::*;
pub use interface::*;
pub use lock::*;
pub use mutex::*;
pub use transition::*;
