#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod clock;
mod config;
mod encoding;
mod error;
mod generator;
mod id;
#[cfg(feature = "serde")]
mod serde;
mod time;

pub use crate::clock::*;
pub use crate::config::*;
pub use crate::encoding::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::time::*;
