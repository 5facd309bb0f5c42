mod alphabet;
mod error;
mod short;

use alphabet::*;
pub use error::*;
pub use short::*;
