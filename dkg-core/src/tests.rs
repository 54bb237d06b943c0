//! Test modules

pub mod helpers;
pub mod polynomial;
