#![allow(dead_code)]

mod assertions;
mod fixtures;
mod test_app;

pub use assertions::{assert_state_finite, assert_unit_attitude};
pub use fixtures::*;
pub use test_app::{TestApp, TestAppBuilder};
