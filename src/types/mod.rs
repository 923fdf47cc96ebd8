//! The PackStream value model.

mod value;

pub use value::{structure_name, Dict, Structure, Value};
