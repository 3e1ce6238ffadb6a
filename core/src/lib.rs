#![no_std]

extern crate alloc;

pub use controller::*;
pub use error::*;
pub use inference::*;
pub use snapshot::*;
pub use symbol::*;
pub use types::*;

mod controller;
mod error;
mod inference;
pub mod sim;
mod snapshot;
mod symbol;
mod types;
