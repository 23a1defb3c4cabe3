//! Validators applied to a candidate after a successful type check.
//!
//! Two styles, one trait: declarative constraints (`Ge`, `Len`, ...) carry
//! their parameters and explain their own failures; [`Predicate`] adapts a
//! plain closure. Both render a canonical `Name(field=value, ...)` form that
//! appears verbatim in match diagnostics, so `Display` output here is part of
//! the stable contract, not decoration.

use std::cmp::Ordering;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::value::{ToValue, Value};

/// A check run against a type-confirmed candidate.
///
/// `Err` carries the explanation used verbatim in the failure message.
/// Implementations must not panic across this boundary; panics from
/// user-supplied code are caught by [`Predicate`] before they reach it.
pub trait Validator: fmt::Display {
    fn check(&self, value: &Value) -> Result<(), String>;
}

#[derive(Copy, Clone)]
enum BoundOp {
    Ge,
    Gt,
    Le,
    Lt,
}

impl BoundOp {
    fn symbol(self) -> &'static str {
        match self {
            BoundOp::Ge => ">=",
            BoundOp::Gt => ">",
            BoundOp::Le => "<=",
            BoundOp::Lt => "<",
        }
    }

    fn admits(self, ordering: Ordering) -> bool {
        match self {
            BoundOp::Ge => ordering != Ordering::Less,
            BoundOp::Gt => ordering == Ordering::Greater,
            BoundOp::Le => ordering != Ordering::Greater,
            BoundOp::Lt => ordering == Ordering::Less,
        }
    }
}

fn check_bound(value: &Value, bound: &Value, op: BoundOp) -> Result<(), String> {
    match value.compare(bound) {
        Some(ordering) if op.admits(ordering) => Ok(()),
        Some(_) => Err(format!("{} is not {} {}", value, op.symbol(), bound)),
        None => Err(format!("{} is not comparable to {}", value, bound)),
    }
}

macro_rules! bound_validator {
    ($(#[$meta:meta])* $name:ident, $field:ident, $op:expr) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name {
            $field: Value,
        }

        impl $name {
            pub fn new(bound: impl ToValue) -> $name {
                $name {
                    $field: bound.to_value(),
                }
            }
        }

        impl Validator for $name {
            fn check(&self, value: &Value) -> Result<(), String> {
                check_bound(value, &self.$field, $op)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    concat!(stringify!($name), "(", stringify!($field), "={})"),
                    self.$field
                )
            }
        }
    };
}

bound_validator!(
    /// Candidate must be greater than or equal to the bound.
    Ge,
    ge,
    BoundOp::Ge
);
bound_validator!(
    /// Candidate must be strictly greater than the bound.
    Gt,
    gt,
    BoundOp::Gt
);
bound_validator!(
    /// Candidate must be less than or equal to the bound.
    Le,
    le,
    BoundOp::Le
);
bound_validator!(
    /// Candidate must be strictly less than the bound.
    Lt,
    lt,
    BoundOp::Lt
);

/// Candidate's length must fall within `min_length..=max_length`.
///
/// Lengths: a `str` counts chars, `bytes` counts bytes, a `list` counts
/// elements, a `map` counts entries. Other kinds have no length and fail.
/// `max_length` is optional: `Len::new(1, None)` checks the minimum only.
#[derive(Clone, Debug)]
pub struct Len {
    min_length: usize,
    max_length: Option<usize>,
}

impl Len {
    pub fn new(min_length: usize, max_length: impl Into<Option<usize>>) -> Len {
        Len {
            min_length,
            max_length: max_length.into(),
        }
    }
}

impl Validator for Len {
    fn check(&self, value: &Value) -> Result<(), String> {
        let Some(len) = value.length() else {
            return Err(format!("value of type {} has no length", value.type_name()));
        };
        if len < self.min_length {
            return Err(format!(
                "length {} is less than min {}",
                len, self.min_length
            ));
        }
        if let Some(max) = self.max_length {
            if len > max {
                return Err(format!("length {} is greater than max {}", len, max));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Len {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max_length {
            Some(max) => write!(
                f,
                "Len(min_length={}, max_length={})",
                self.min_length, max
            ),
            None => write!(f, "Len(min_length={}, max_length=None)", self.min_length),
        }
    }
}

/// Candidate must be an exact multiple of the divisor.
///
/// Int/int divides exactly; any int/float mix divides through `f64`. A zero
/// divisor (and any non-numeric operand) fails with the standard wording.
#[derive(Clone, Debug)]
pub struct MultipleOf {
    multiple_of: Value,
}

impl MultipleOf {
    pub fn new(divisor: impl ToValue) -> MultipleOf {
        MultipleOf {
            multiple_of: divisor.to_value(),
        }
    }
}

fn as_f64(value: &Value) -> f64 {
    match value {
        Value::Int(i) => *i as f64,
        Value::Float(x) => *x,
        _ => f64::NAN,
    }
}

impl Validator for MultipleOf {
    fn check(&self, value: &Value) -> Result<(), String> {
        let divides = match (value, &self.multiple_of) {
            (Value::Int(v), Value::Int(m)) => match *m {
                0 => false,
                // `i64::MIN % -1` overflows; every value is a multiple of 1.
                -1 | 1 => true,
                m => v % m == 0,
            },
            (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                as_f64(value) % as_f64(&self.multiple_of) == 0.0
            }
            _ => false,
        };
        if divides {
            Ok(())
        } else {
            Err(format!(
                "{} is not a multiple of {}",
                value, self.multiple_of
            ))
        }
    }
}

impl fmt::Display for MultipleOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MultipleOf(multiple_of={})", self.multiple_of)
    }
}

/// Adapts a plain `Fn(&Value) -> bool` closure into a validator.
///
/// A `false` result fails with `predicate returned false`. A panic inside the
/// closure is caught and converted into a failure carrying the panic message,
/// so a throwing predicate cannot crash the assertion machinery.
///
/// Closures have no useful canonical rendering, so [`Predicate::from_fn`]
/// renders as `Predicate(<fn>)`; use [`Predicate::named`] to label the
/// predicate in diagnostics.
pub struct Predicate {
    name: Option<String>,
    func: Box<dyn Fn(&Value) -> bool>,
}

impl Predicate {
    pub fn from_fn(func: impl Fn(&Value) -> bool + 'static) -> Predicate {
        Predicate {
            name: None,
            func: Box::new(func),
        }
    }

    pub fn named(name: impl Into<String>, func: impl Fn(&Value) -> bool + 'static) -> Predicate {
        Predicate {
            name: Some(name.into()),
            func: Box::new(func),
        }
    }
}

impl Validator for Predicate {
    fn check(&self, value: &Value) -> Result<(), String> {
        match catch_unwind(AssertUnwindSafe(|| (self.func)(value))) {
            Ok(true) => Ok(()),
            Ok(false) => Err("predicate returned false".to_string()),
            Err(payload) => {
                let message = match payload.downcast_ref::<&'static str>() {
                    Some(s) => Some(s.to_string()),
                    None => payload.downcast_ref::<String>().cloned(),
                };
                match message {
                    Some(message) => Err(format!("predicate panicked: {}", message)),
                    None => Err("predicate panicked".to_string()),
                }
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "Predicate({})", name),
            None => f.write_str("Predicate(<fn>)"),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
