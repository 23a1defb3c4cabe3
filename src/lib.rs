//! Value matchers for test assertions.
//!
//! An [`AnyValue`] compares equal to any value satisfying a declared type
//! expression and a sequence of validators, so a test can assert on the shape
//! of a value whose exact content is unknowable (generated ids, timestamps,
//! free-form messages):
//!
//! ```
//! use anyvalue::{AnyValue, Ge, ValueKind};
//!
//! let id = AnyValue::new(ValueKind::Int).with(Ge::new(0));
//! assert_eq!(id, 42);
//! assert_ne!(id, -3);
//! assert_ne!(id, "42");
//! ```
//!
//! A failed evaluation records its reason, and the matcher's rendering
//! carries it, so the host framework's failure output explains the mismatch:
//!
//! ```
//! use anyvalue::{AnyValue, Ge, ValueKind};
//!
//! let matcher = AnyValue::new(ValueKind::Int).with(Ge::new(10));
//! assert!(matcher != 5);
//! assert_eq!(
//!     matcher.to_string(),
//!     "AnyValue(int, Ge(ge=10))\n  Reason: Validator Ge(ge=10) failed: 5 is not >= 10"
//! );
//! ```
//!
//! See `demos/mock_args.rs` for verifying recorded mock-call arguments.

use std::cell::RefCell;
use std::fmt;

mod error;
mod type_spec;
mod validate;
mod value;

pub use crate::error::{ParseError, ParseErrorKind};
pub use crate::type_spec::{TypeSpec, NONE};
pub use crate::validate::{Ge, Gt, Le, Len, Lt, MultipleOf, Predicate, Validator};
pub use crate::value::{ToValue, Value, ValueKind};

/// The reason the most recent evaluation failed, with every field resolved
/// to its rendered form at capture time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Failure {
    /// The candidate's runtime type is incompatible with the declared spec.
    TypeMismatch {
        expected: String,
        actual_type: &'static str,
        actual_value: String,
    },
    /// The candidate passed the type check but failed a validator.
    ValidatorFailure {
        validator: String,
        actual_value: String,
        detail: String,
    },
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::TypeMismatch {
                expected,
                actual_type,
                actual_value,
            } => write!(
                f,
                "Expected type {}, got {} ({})",
                expected, actual_type, actual_value
            ),
            Failure::ValidatorFailure {
                validator, detail, ..
            } => write!(f, "Validator {} failed: {}", validator, detail),
        }
    }
}

/// A matcher that compares equal to any value satisfying its type expression
/// and validators.
///
/// ```
/// use anyvalue::{AnyValue, Len, ValueKind, NONE};
///
/// let name = AnyValue::new(ValueKind::Str).with(Len::new(1, None));
/// assert_eq!(name, "amos");
/// assert_ne!(name, "");
///
/// let maybe_id = AnyValue::new(ValueKind::Int | NONE);
/// assert_eq!(maybe_id, 7);
/// assert_eq!(maybe_id, None::<i32>);
/// ```
///
/// Equality works in both operand positions: the matcher side accepts any
/// [`ToValue`] candidate, and the common candidate types (`bool`, the int and
/// float primitives, `&str`, `String`, [`Value`] and their `Option`s) carry
/// the reverse impls. For anything else, put the matcher on the left or call
/// [`AnyValue::matches`].
///
/// The matcher keeps single-evaluation scratch state for diagnostics in a
/// `RefCell`, which makes it intentionally not `Sync`: it lives inside one
/// assertion on one thread, per its lifecycle.
pub struct AnyValue {
    spec: TypeSpec,
    validators: Vec<Box<dyn Validator>>,
    last_failure: RefCell<Option<Failure>>,
}

impl AnyValue {
    /// Creates a matcher accepting values compatible with `spec`.
    ///
    /// `spec` is a [`ValueKind`], the [`NONE`] marker, or a `|`-composed
    /// union of these. Validators are attached with [`AnyValue::with`] and
    /// are not checked for kind compatibility up front; a mismatched
    /// validator surfaces as a failed match at evaluation time.
    ///
    /// # Panics
    ///
    /// Panics if `spec` admits no type at all (an empty union). This is a
    /// construction-time usage error, not a match failure.
    pub fn new(spec: impl Into<TypeSpec>) -> AnyValue {
        let spec = spec.into();
        if spec.is_empty() {
            panic!("AnyValue requires at least one acceptable type");
        }
        AnyValue {
            spec,
            validators: Vec::new(),
            last_failure: RefCell::new(None),
        }
    }

    /// Appends a validator. Validators run in the order attached, and the
    /// first failure is the one reported.
    pub fn with(mut self, validator: impl Validator + 'static) -> AnyValue {
        self.validators.push(Box::new(validator));
        self
    }

    /// The declared type expression.
    pub fn spec(&self) -> &TypeSpec {
        &self.spec
    }

    /// The reason the most recent evaluation failed, if it did.
    pub fn last_failure(&self) -> Option<Failure> {
        self.last_failure.borrow().clone()
    }

    /// Evaluates the matcher against a candidate.
    ///
    /// This is the operation behind `==`. Evaluation is fresh on every call:
    /// it overwrites the recorded failure, clearing it when the candidate
    /// matches. It never panics for a failing candidate; a panicking
    /// predicate is captured as a validator failure.
    pub fn matches(&self, candidate: impl ToValue) -> bool {
        self.evaluate(&candidate.to_value())
    }

    fn evaluate(&self, candidate: &Value) -> bool {
        if !self.spec.is_compatible(candidate) {
            let failure = Failure::TypeMismatch {
                expected: self.spec.to_string(),
                actual_type: candidate.type_name(),
                actual_value: candidate.to_string(),
            };
            tracing::trace!("match failed: {}", failure);
            *self.last_failure.borrow_mut() = Some(failure);
            return false;
        }
        for validator in &self.validators {
            if let Err(detail) = validator.check(candidate) {
                let failure = Failure::ValidatorFailure {
                    validator: validator.to_string(),
                    actual_value: candidate.to_string(),
                    detail,
                };
                tracing::trace!("match failed: {}", failure);
                *self.last_failure.borrow_mut() = Some(failure);
                return false;
            }
        }
        *self.last_failure.borrow_mut() = None;
        tracing::trace!("{} matched {}", self, candidate);
        true
    }
}

impl fmt::Display for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnyValue({}", self.spec)?;
        for validator in &self.validators {
            write!(f, ", {}", validator)?;
        }
        write!(f, ")")?;
        let failure = self.last_failure.borrow();
        if let Some(failure) = failure.as_ref() {
            write!(f, "\n  Reason: {}", failure)?;
        }
        Ok(())
    }
}

// `assert_eq!` renders its operands with `Debug`, so `Debug` must carry the
// same diagnostic text as `Display` for the reason to reach test output.
impl fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<T: ToValue> PartialEq<T> for AnyValue {
    fn eq(&self, other: &T) -> bool {
        self.evaluate(&other.to_value())
    }
}

// The fully generic reverse direction is forbidden by coherence, so the
// candidate types assertions actually put on the left get concrete impls.
macro_rules! impl_candidate_eq {
    ($($ty:ty),+ $(,)?) => {$(
        impl PartialEq<AnyValue> for $ty {
            fn eq(&self, matcher: &AnyValue) -> bool {
                matcher.evaluate(&self.to_value())
            }
        }

        impl PartialEq<AnyValue> for Option<$ty> {
            fn eq(&self, matcher: &AnyValue) -> bool {
                matcher.evaluate(&self.to_value())
            }
        }
    )+};
}

impl_candidate_eq!(Value, bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, String);

impl PartialEq<AnyValue> for str {
    fn eq(&self, matcher: &AnyValue) -> bool {
        matcher.evaluate(&self.to_value())
    }
}

impl<'a> PartialEq<AnyValue> for &'a str {
    fn eq(&self, matcher: &AnyValue) -> bool {
        matcher.evaluate(&self.to_value())
    }
}

impl<'a> PartialEq<AnyValue> for Option<&'a str> {
    fn eq(&self, matcher: &AnyValue) -> bool {
        matcher.evaluate(&self.to_value())
    }
}
