//! The six built-in scalars, one per [`Kind`].
//!
//! Each is a thin newtype over [`ScalarAdapter`] fixing the name, kind and
//! output coercion:
//!
//! | scalar       | kind    | coercion        |
//! |--------------|---------|-----------------|
//! | `JoiAny`     | any     | identity        |
//! | `JoiArray`   | array   | list normalize  |
//! | `JoiBoolean` | boolean | truthiness      |
//! | `JoiDate`    | date    | identity        |
//! | `JoiNumber`  | number  | numeric cast    |
//! | `JoiString`  | string  | string cast     |

use super::adapter::{LiteralNode, ScalarAdapter, ScalarType, Serialized};
use super::coerce;
use crate::core::{ConstraintOptions, Kind};
use crate::error::Result;
use crate::value::Value;
use std::ops::Deref;

macro_rules! impl_scalar_kind {
    ($(#[$doc:meta])* $scalar:ident, $kind:expr, $constructor:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $scalar(ScalarAdapter);

        impl $scalar {
            /// Compiles `options` into this scalar's rule.
            pub fn new(options: &ConstraintOptions) -> Self {
                Self(ScalarAdapter::new(
                    stringify!($scalar),
                    $kind,
                    coerce::for_kind($kind),
                    options,
                ))
            }

            pub fn into_adapter(self) -> ScalarAdapter {
                self.0
            }
        }

        impl Default for $scalar {
            fn default() -> Self {
                Self::new(&ConstraintOptions::new())
            }
        }

        impl Deref for $scalar {
            type Target = ScalarAdapter;

            fn deref(&self) -> &ScalarAdapter {
                &self.0
            }
        }

        impl From<$scalar> for ScalarAdapter {
            fn from(scalar: $scalar) -> Self {
                scalar.0
            }
        }

        impl ScalarType for $scalar {
            fn name(&self) -> &str {
                self.0.name()
            }

            fn description(&self) -> &str {
                self.0.description()
            }

            fn serialize(&self, value: Value) -> Serialized {
                self.0.serialize(value)
            }

            fn parse_value(&self, node: &mut LiteralNode) -> Result<Option<Value>> {
                self.0.parse_value(node)
            }

            fn parse_literal(&self, node: &mut LiteralNode) -> Result<Option<Value>> {
                self.0.parse_literal(node)
            }
        }

        #[doc = concat!("Creates a [`", stringify!($scalar), "`] from `options`.")]
        pub fn $constructor(options: &ConstraintOptions) -> $scalar {
            $scalar::new(options)
        }
    };
}

impl_scalar_kind!(
    /// Accepts any value; outgoing values are not coerced.
    JoiAny,
    Kind::Any,
    any
);

impl_scalar_kind!(
    /// Lists. Outgoing strings become lists of characters.
    JoiArray,
    Kind::Array,
    array
);

impl_scalar_kind!(
    /// Booleans. Outgoing values are reduced to their truthiness.
    JoiBoolean,
    Kind::Boolean,
    boolean
);

impl_scalar_kind!(
    /// Dates, from timestamps or ISO strings.
    JoiDate,
    Kind::Date,
    date
);

impl_scalar_kind!(
    /// Finite numbers. Outgoing values are cast to numbers.
    JoiNumber,
    Kind::Number,
    number
);

impl_scalar_kind!(
    /// Strings. Outgoing values are cast to strings.
    JoiString,
    Kind::String,
    string
);
