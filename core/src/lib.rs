//! Core value types for docopt-style usage matching.
//!
//! This crate defines the data that comes out of a match:
//!
//! - [`Value`]: the tagged union bound to every grammar name (empty, bool,
//!   counter, string, or string list), with kind-checked accessors.
//! - [`ArgMap`]: the ordered name → value map a successful match produces.
//!
//! The grammar compiler and matcher live in the `docopt-engine` crate; this
//! crate has no knowledge of usage text.
//!
//! # Example
//!
//! ```
//! use docopt_core::{ArgMap, Value};
//!
//! let mut args = ArgMap::new();
//! args.insert("--speed", Value::from("15"));
//! args.insert("move", Value::Bool(true));
//!
//! let speed = args.get("--speed").unwrap().as_integer().unwrap();
//! assert_eq!(speed, 15);
//! assert!(args.get_bool("move"));
//! ```

mod args;
mod value;

pub use args::ArgMap;
pub use value::{Value, ValueError, ValueKind};
