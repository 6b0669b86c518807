//! track-changes-value - structural tree values for change tracking.
//!
//! A [`Value`] is an object, an array, or an opaque leaf. Every edit goes
//! through a consuming [`Value::rebuild`], so code holding a borrowed
//! document can never mutate it by accident.

pub mod equal;
pub mod path;
pub mod rebuild;
pub mod value;

pub use equal::{deep_equal, deep_equal_opt};
pub use path::{get_opt_path_value, get_path_value, get_path_value_mut};
pub use rebuild::Edit;
pub use value::{Scalar, Shape, Value};
