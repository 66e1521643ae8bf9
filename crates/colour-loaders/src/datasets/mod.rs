//! Concrete dataset loaders.

pub mod breneman1987;
pub mod luo1999;

pub use breneman1987::{Breneman1987DatasetLoader, build_breneman1987};
pub use luo1999::{Luo1999DatasetLoader, build_luo1999};
