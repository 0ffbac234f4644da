//! Custom scalars backed by compiled rules.
//!
//! [`ScalarAdapter`] is the general building block; [`JoiString`],
//! [`JoiNumber`] and friends are ready-made adapters for each [`Kind`], and
//! [`ScalarRegistry`] builds adapters from JSON definitions.
//!
//! ## Example
//!
//! ```rust
//! use scalar_guard::core::ConstraintOptions;
//! use scalar_guard::scalar::{self, LiteralNode, ScalarType};
//! use scalar_guard::value::Value;
//!
//! let options = ConstraintOptions::new().with("valid", vec!["roger", "william"]);
//! let name = scalar::any(&options);
//!
//! let mut node = LiteralNode::value("roger");
//! assert_eq!(name.parse_literal(&mut node).unwrap(), Some(Value::from("roger")));
//!
//! let err = name.parse_literal(&mut LiteralNode::value("sarah")).unwrap_err();
//! assert!(err.to_string().contains("[roger, william]"));
//! ```
//!
//! [`Kind`]: crate::core::Kind

mod adapter;
pub mod coerce;
mod config;
mod kinds;

pub use adapter::{LiteralNode, ScalarAdapter, ScalarType, Serialized};
pub use coerce::CoerceFn;
pub use config::{ScalarDefinition, ScalarRegistry};
pub use kinds::{
    any, array, boolean, date, number, string, JoiAny, JoiArray, JoiBoolean, JoiDate, JoiNumber,
    JoiString,
};
