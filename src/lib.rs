#![warn(clippy::all)]
#![deny(rust_2018_idioms)]

pub mod actions;
pub mod catalog;
pub mod cli;
pub mod constraint;
pub mod cost;
pub mod costtarget;
pub mod engine;
pub mod error;
pub mod library;
pub mod property;
pub mod rand_stream;
pub mod report;
pub mod selection;

pub use catalog::{Card, Catalog, Pile};
pub use constraint::{ConsResult, Constraint};
pub use cost::{Cost, CostSet};
pub use engine::{build_selection, generate_selection};
pub use selection::Selection;
