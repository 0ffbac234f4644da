//! Compiles `(kind, options)` into a [`Rule`].
//!
//! Each kind has a static table mapping constraint names to apply functions.
//! Options are applied in order; a name that neither the shared table nor the
//! kind's table knows is skipped. Parameter problems never fail compilation:
//! they are recorded on the rule and reported when a value is validated.

use super::{ConstraintOptions, Kind, Params, Rule};
use crate::constraints::{
    Assertion, BaseType, Case, DateComparison, DateConstraint, DateFormat, DateLimit, Encoding,
    FormatConstraint, FormatType, LengthConstraint, NumberCheck, NumberConstraint, MAX_PRECISION,
    TimestampUnit, UniqueItemsConstraint,
};
use crate::value::Value;
use tracing::{debug, instrument};

/// Applies one constraint, with its positional parameters, to a rule.
pub type ApplyFn = fn(Rule, &Params<'_>) -> Rule;

type Table = &'static [(&'static str, ApplyFn)];

const SHARED: Table = &[
    ("allow", allow),
    ("valid", valid),
    ("only", valid),
    ("equal", valid),
    ("invalid", invalid),
    ("disallow", invalid),
    ("not", invalid),
    ("required", required),
    ("exist", required),
    ("optional", optional),
    ("forbidden", forbidden),
    ("default", default_value),
    ("label", label),
    ("description", description),
    ("strict", strict),
    ("raw", raw),
];

const STRING: Table = &[
    ("min", string_min),
    ("max", string_max),
    ("length", string_length),
    ("alphanum", alphanum),
    ("token", token),
    ("hex", hex),
    ("regex", regex),
    ("pattern", regex),
    ("email", email),
    ("guid", guid),
    ("uuid", guid),
    ("lowercase", lowercase),
    ("uppercase", uppercase),
    ("trim", trim),
    ("insensitive", insensitive),
];

const NUMBER: Table = &[
    ("min", number_min),
    ("max", number_max),
    ("greater", number_greater),
    ("less", number_less),
    ("integer", integer),
    ("positive", positive),
    ("negative", negative),
    ("precision", precision),
    ("multiple", multiple),
    ("port", port),
];

const BOOLEAN: Table = &[
    ("truthy", truthy),
    ("falsy", falsy),
    ("insensitive", insensitive),
];

const DATE: Table = &[
    ("min", date_min),
    ("max", date_max),
    ("greater", date_greater),
    ("less", date_less),
    ("iso", iso),
    ("timestamp", timestamp),
];

const ARRAY: Table = &[
    ("min", array_min),
    ("max", array_max),
    ("length", array_length),
    ("unique", unique),
    ("single", single),
];

fn table(kind: Kind) -> Table {
    match kind {
        Kind::Any => &[],
        Kind::Array => ARRAY,
        Kind::Boolean => BOOLEAN,
        Kind::Date => DATE,
        Kind::Number => NUMBER,
        Kind::String => STRING,
    }
}

/// Finds the apply function for `name` on `kind`, shared entries first.
pub fn lookup(kind: Kind, name: &str) -> Option<ApplyFn> {
    SHARED
        .iter()
        .chain(table(kind))
        .find(|(entry, _)| *entry == name)
        .map(|(_, apply)| *apply)
}

/// Names of every constraint `kind` supports.
pub fn supported_constraints(kind: Kind) -> impl Iterator<Item = &'static str> {
    SHARED.iter().chain(table(kind)).map(|(name, _)| *name)
}

/// Builds the rule for `kind` from `options`.
///
/// # Examples
///
/// ```rust
/// use scalar_guard::core::{compile, ConstraintOptions, Kind};
/// use scalar_guard::value::Value;
///
/// let options = ConstraintOptions::new()
///     .with("min", vec![Value::from(2), Value::from("utf8")])
///     .with("max", 10)
///     .with("whatever", true);
/// let rule = compile(Kind::String, &options);
///
/// assert!(rule.validate(Value::from("roger")).is_ok());
/// assert!(rule.validate(Value::from("r")).is_err());
/// ```
#[instrument(skip(options), fields(option_count = options.len()))]
pub fn compile(kind: Kind, options: &ConstraintOptions) -> Rule {
    options
        .iter()
        .fold(Rule::base(kind), |rule, (name, option)| match lookup(kind, name) {
            Some(apply) => {
                debug!(constraint = name, "applying constraint");
                apply(rule, &Params::from_option(option))
            }
            None => {
                debug!(constraint = name, "skipping unsupported constraint");
                rule
            }
        })
}

fn with_param<T>(
    rule: Rule,
    constraint: &str,
    param: Result<T, String>,
    apply: impl FnOnce(Rule, T) -> Rule,
) -> Rule {
    match param {
        Ok(value) => apply(rule, value),
        Err(message) => {
            debug!(constraint, %message, "recording invalid constraint argument");
            rule.argument_issue(constraint, message)
        }
    }
}

// shared

fn allow(rule: Rule, params: &Params<'_>) -> Rule {
    rule.allow(params.values().iter().cloned())
}

fn valid(rule: Rule, params: &Params<'_>) -> Rule {
    rule.valid(params.values().iter().cloned())
}

fn invalid(rule: Rule, params: &Params<'_>) -> Rule {
    rule.invalid(params.values().iter().cloned())
}

fn required(rule: Rule, _: &Params<'_>) -> Rule {
    rule.required()
}

fn optional(rule: Rule, _: &Params<'_>) -> Rule {
    rule.optional()
}

fn forbidden(rule: Rule, _: &Params<'_>) -> Rule {
    rule.forbidden()
}

fn default_value(rule: Rule, params: &Params<'_>) -> Rule {
    let value = params
        .get(0)
        .cloned()
        .ok_or_else(|| "missing default value".to_string());
    with_param(rule, "default", value, Rule::default_value)
}

fn label(rule: Rule, params: &Params<'_>) -> Rule {
    with_param(rule, "label", params.string(0), Rule::with_label)
}

fn description(rule: Rule, params: &Params<'_>) -> Rule {
    with_param(rule, "description", params.string(0), Rule::with_description)
}

fn strict(rule: Rule, params: &Params<'_>) -> Rule {
    with_param(rule, "strict", params.flag(0), Rule::strict)
}

fn raw(rule: Rule, params: &Params<'_>) -> Rule {
    with_param(rule, "raw", params.flag(0), Rule::raw)
}

fn insensitive(rule: Rule, params: &Params<'_>) -> Rule {
    with_param(rule, "insensitive", params.flag(0), Rule::insensitive)
}

// string

fn string_limit(params: &Params<'_>) -> Result<(usize, Option<Encoding>), String> {
    let limit = params.count(0)?;
    let encoding = params
        .optional_string(1)?
        .map(str::parse::<Encoding>)
        .transpose()?;
    Ok((limit, encoding))
}

fn string_min(rule: Rule, params: &Params<'_>) -> Rule {
    with_param(rule, "min", string_limit(params), |rule, (limit, encoding)| {
        rule.constrain(LengthConstraint::min(limit).with_encoding(encoding))
    })
}

fn string_max(rule: Rule, params: &Params<'_>) -> Rule {
    with_param(rule, "max", string_limit(params), |rule, (limit, encoding)| {
        rule.constrain(LengthConstraint::max(limit).with_encoding(encoding))
    })
}

fn string_length(rule: Rule, params: &Params<'_>) -> Rule {
    with_param(rule, "length", string_limit(params), |rule, (limit, encoding)| {
        rule.constrain(LengthConstraint::exactly(limit).with_encoding(encoding))
    })
}

fn alphanum(rule: Rule, _: &Params<'_>) -> Rule {
    rule.constrain(FormatConstraint::new(FormatType::Alphanum))
}

fn token(rule: Rule, _: &Params<'_>) -> Rule {
    rule.constrain(FormatConstraint::new(FormatType::Token))
}

fn hex(rule: Rule, _: &Params<'_>) -> Rule {
    rule.constrain(FormatConstraint::new(FormatType::Hex))
}

fn email(rule: Rule, _: &Params<'_>) -> Rule {
    rule.constrain(FormatConstraint::new(FormatType::Email))
}

fn guid(rule: Rule, _: &Params<'_>) -> Rule {
    rule.constrain(FormatConstraint::new(FormatType::Guid))
}

/// The pattern name may be given directly or as `{ "name": ... }`.
fn pattern_name<'a>(params: &Params<'a>) -> Result<Option<&'a str>, String> {
    match params.get(1) {
        Some(Value::Object(options)) => match options.get("name") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(name)) => Ok(Some(name.as_str())),
            Some(other) => Err(format!("pattern name must be a string, got {}", other.type_name())),
        },
        _ => params.optional_string(1),
    }
}

fn regex(rule: Rule, params: &Params<'_>) -> Rule {
    let constraint = params
        .string(0)
        .and_then(|pattern| FormatConstraint::regex(pattern, pattern_name(params)?));
    with_param(rule, "regex", constraint, Rule::constrain)
}

fn set_case(mut rule: Rule, case: Case) -> Rule {
    if let BaseType::String { case: slot, .. } = rule.base_type_mut() {
        *slot = Some(case);
    }
    rule.constrain(FormatConstraint::new(FormatType::Case(case)))
}

fn lowercase(rule: Rule, _: &Params<'_>) -> Rule {
    set_case(rule, Case::Lower)
}

fn uppercase(rule: Rule, _: &Params<'_>) -> Rule {
    set_case(rule, Case::Upper)
}

fn trim(rule: Rule, params: &Params<'_>) -> Rule {
    with_param(rule, "trim", params.flag(0), |mut rule, enabled| {
        if let BaseType::String { trim, .. } = rule.base_type_mut() {
            *trim = enabled;
        }
        if enabled {
            rule.constrain(FormatConstraint::new(FormatType::Trim))
        } else {
            rule
        }
    })
}

// number

fn number_bound(
    rule: Rule,
    params: &Params<'_>,
    constraint: &str,
    assertion: fn(f64) -> Assertion,
) -> Rule {
    with_param(rule, constraint, params.number(0), |rule, limit| {
        rule.constrain(NumberConstraint::bound(assertion(limit)))
    })
}

fn number_min(rule: Rule, params: &Params<'_>) -> Rule {
    number_bound(rule, params, "min", Assertion::GreaterThanOrEqual)
}

fn number_max(rule: Rule, params: &Params<'_>) -> Rule {
    number_bound(rule, params, "max", Assertion::LessThanOrEqual)
}

fn number_greater(rule: Rule, params: &Params<'_>) -> Rule {
    number_bound(rule, params, "greater", Assertion::GreaterThan)
}

fn number_less(rule: Rule, params: &Params<'_>) -> Rule {
    number_bound(rule, params, "less", Assertion::LessThan)
}

fn integer(rule: Rule, _: &Params<'_>) -> Rule {
    rule.constrain(NumberConstraint::new(NumberCheck::Integer))
}

fn positive(rule: Rule, _: &Params<'_>) -> Rule {
    rule.constrain(NumberConstraint::new(NumberCheck::Positive))
}

fn negative(rule: Rule, _: &Params<'_>) -> Rule {
    rule.constrain(NumberConstraint::new(NumberCheck::Negative))
}

fn port(rule: Rule, _: &Params<'_>) -> Rule {
    rule.constrain(NumberConstraint::new(NumberCheck::Port))
}

fn precision(rule: Rule, params: &Params<'_>) -> Rule {
    let digits = params.count(0).and_then(|digits| match u32::try_from(digits) {
        Ok(digits) if digits <= MAX_PRECISION => Ok(digits),
        _ => Err(format!(
            "precision must be at most {MAX_PRECISION} decimal places, got {digits}"
        )),
    });
    with_param(rule, "precision", digits, |mut rule, digits| {
        if let BaseType::Number { precision } = rule.base_type_mut() {
            *precision = Some(digits);
        }
        rule.constrain(NumberConstraint::new(NumberCheck::Precision(digits)))
    })
}

fn multiple(rule: Rule, params: &Params<'_>) -> Rule {
    let base = params.number(0).and_then(|base| {
        if base > 0.0 {
            Ok(base)
        } else {
            Err(format!("multiple must be a positive number, got {base}"))
        }
    });
    with_param(rule, "multiple", base, |rule, base| {
        rule.constrain(NumberConstraint::new(NumberCheck::Multiple(base)))
    })
}

// boolean

fn truthy(mut rule: Rule, params: &Params<'_>) -> Rule {
    if let BaseType::Boolean { truthy, .. } = rule.base_type_mut() {
        for value in params.values() {
            truthy.add(value.clone());
        }
    }
    rule
}

fn falsy(mut rule: Rule, params: &Params<'_>) -> Rule {
    if let BaseType::Boolean { falsy, .. } = rule.base_type_mut() {
        for value in params.values() {
            falsy.add(value.clone());
        }
    }
    rule
}

// date

fn date_bound(
    rule: Rule,
    params: &Params<'_>,
    constraint: &str,
    comparison: DateComparison,
) -> Rule {
    let limit = params
        .get(0)
        .and_then(DateLimit::from_value)
        .ok_or_else(|| "limit must be a timestamp, an ISO date or \"now\"".to_string());
    with_param(rule, constraint, limit, |rule, limit| {
        rule.constrain(DateConstraint::new(comparison, limit))
    })
}

fn date_min(rule: Rule, params: &Params<'_>) -> Rule {
    date_bound(rule, params, "min", DateComparison::Min)
}

fn date_max(rule: Rule, params: &Params<'_>) -> Rule {
    date_bound(rule, params, "max", DateComparison::Max)
}

fn date_greater(rule: Rule, params: &Params<'_>) -> Rule {
    date_bound(rule, params, "greater", DateComparison::Greater)
}

fn date_less(rule: Rule, params: &Params<'_>) -> Rule {
    date_bound(rule, params, "less", DateComparison::Less)
}

fn set_date_format(mut rule: Rule, date_format: DateFormat) -> Rule {
    if let BaseType::Date { format } = rule.base_type_mut() {
        *format = date_format;
    }
    rule
}

fn iso(rule: Rule, _: &Params<'_>) -> Rule {
    set_date_format(rule, DateFormat::Iso)
}

fn timestamp(rule: Rule, params: &Params<'_>) -> Rule {
    let unit = params.optional_string(0).and_then(|unit| match unit {
        None | Some("javascript") => Ok(TimestampUnit::Javascript),
        Some("unix") => Ok(TimestampUnit::Unix),
        Some(other) => Err(format!(
            "timestamp type must be \"javascript\" or \"unix\", got \"{other}\""
        )),
    });
    with_param(rule, "timestamp", unit, |rule, unit| {
        set_date_format(rule, DateFormat::Timestamp(unit))
    })
}

// array

fn array_min(rule: Rule, params: &Params<'_>) -> Rule {
    with_param(rule, "min", params.count(0), |rule, limit| {
        rule.constrain(LengthConstraint::min(limit).items())
    })
}

fn array_max(rule: Rule, params: &Params<'_>) -> Rule {
    with_param(rule, "max", params.count(0), |rule, limit| {
        rule.constrain(LengthConstraint::max(limit).items())
    })
}

fn array_length(rule: Rule, params: &Params<'_>) -> Rule {
    with_param(rule, "length", params.count(0), |rule, limit| {
        rule.constrain(LengthConstraint::exactly(limit).items())
    })
}

fn unique(rule: Rule, _: &Params<'_>) -> Rule {
    rule.constrain(UniqueItemsConstraint::new())
}

fn single(rule: Rule, params: &Params<'_>) -> Rule {
    with_param(rule, "single", params.flag(0), |mut rule, enabled| {
        if let BaseType::Array { single } = rule.base_type_mut() {
            *single = enabled;
        }
        rule
    })
}
