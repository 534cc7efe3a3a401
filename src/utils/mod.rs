pub mod constants;
pub mod errors;
pub mod math;
pub mod tables;

pub use constants::*;
pub use errors::*;
pub use math::*;
pub use tables::{Table1D, Table2D, TableError};
