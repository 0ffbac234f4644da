//! Built-in constraint implementations for scalar validation.
//!
//! Each constraint implements the [`Constraint`](crate::core::Constraint)
//! trait and is attached to a [`Rule`](crate::core::Rule). Constraints that do
//! not apply to a value's type let it pass untouched; the rule's
//! [`BaseType`] is responsible for type checks.
//!
//! ## Overview
//!
//! 1. **[`BaseType`]** - per-kind type check and conversion
//! 2. **[`LengthConstraint`]** - string lengths (UTF-16 units or encoded
//!    bytes) and list item counts
//! 3. **[`NumberConstraint`]** - bounds, integrality, sign, precision,
//!    multiples and ports
//! 4. **[`FormatConstraint`]** - character classes, email, GUID, custom
//!    patterns, case and whitespace
//! 5. **[`DateConstraint`]** - date bounds, fixed or relative to now
//! 6. **[`UniqueItemsConstraint`]** - duplicate-free lists
//!
//! ## Example
//!
//! ```rust
//! use scalar_guard::constraints::{Assertion, LengthConstraint, NumberConstraint};
//! use scalar_guard::core::{Kind, Rule};
//! use scalar_guard::value::Value;
//!
//! let name = Rule::base(Kind::String)
//!     .constrain(LengthConstraint::min(2))
//!     .constrain(LengthConstraint::max(10));
//! assert!(name.validate(Value::from("roger")).is_ok());
//!
//! let age = Rule::base(Kind::Number)
//!     .constrain(NumberConstraint::bound(Assertion::GreaterThanOrEqual(0.0)));
//! assert_eq!(age.validate(Value::from("42")), Ok(Value::from(42)));
//! ```

mod assertion;
mod datatype;
mod format;
mod length;
mod numeric;
mod temporal;
mod values;

pub use assertion::Assertion;
pub use datatype::BaseType;
pub use format::{Case, FormatConstraint, FormatType};
pub use length::{Encoding, LengthAssertion, LengthConstraint, LengthTarget};
pub use numeric::{round_to, NumberCheck, NumberConstraint, MAX_PRECISION};
pub use temporal::{
    parse_iso, to_date, DateComparison, DateConstraint, DateFormat, DateLimit, TimestampUnit,
};
pub use values::{UniqueItemsConstraint, ValueSet};
