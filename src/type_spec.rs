use std::fmt;
use std::ops;
use std::str::FromStr;

use itertools::Itertools;

use crate::error::{ParseError, ParseErrorKind};
use crate::value::{Value, ValueKind};

/// The declared acceptable shape(s) of a matched value: a single kind, the
/// `None` marker, or an ordered union of these.
///
/// Unions are built with `|` and render in declaration order:
///
/// ```
/// use anyvalue::{TypeSpec, ValueKind, NONE};
///
/// let spec = ValueKind::Int | ValueKind::Float;
/// assert_eq!(spec.to_string(), "int | float");
/// assert_eq!((ValueKind::Str | NONE).to_string(), "str | None");
/// assert_eq!("str | None".parse::<TypeSpec>().unwrap(), ValueKind::Str | NONE);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeSpec {
    /// Matches only the absence of a value, `Value::None`.
    None,
    /// Matches values of exactly this kind. No numeric promotion happens:
    /// `Bool` is not an `Int`, and `Int` and `Float` are mutually exclusive.
    Kind(ValueKind),
    /// Matches values compatible with at least one member, tried in order.
    Union(Vec<TypeSpec>),
}

/// The absence marker, for composing optional specs like `Str | NONE`.
pub const NONE: TypeSpec = TypeSpec::None;

impl TypeSpec {
    /// Whether the candidate's runtime type satisfies this spec.
    ///
    /// Union members are tried in declared order and short-circuit on the
    /// first compatible one.
    pub fn is_compatible(&self, candidate: &Value) -> bool {
        match self {
            TypeSpec::None => candidate.is_none(),
            TypeSpec::Kind(kind) => candidate.kind() == Some(*kind),
            TypeSpec::Union(members) => {
                members.iter().any(|member| member.is_compatible(candidate))
            }
        }
    }

    /// Whether the spec admits no type at all (an empty union).
    pub fn is_empty(&self) -> bool {
        match self {
            TypeSpec::Union(members) => members.iter().all(|member| member.is_empty()),
            _ => false,
        }
    }

    fn or(self, rhs: TypeSpec) -> TypeSpec {
        let mut members = match self {
            TypeSpec::Union(members) => members,
            leaf => vec![leaf],
        };
        match rhs {
            TypeSpec::Union(rhs_members) => members.extend(rhs_members),
            leaf => members.push(leaf),
        }
        TypeSpec::Union(members)
    }
}

impl From<ValueKind> for TypeSpec {
    fn from(kind: ValueKind) -> TypeSpec {
        TypeSpec::Kind(kind)
    }
}

impl ops::BitOr for TypeSpec {
    type Output = TypeSpec;

    fn bitor(self, rhs: TypeSpec) -> TypeSpec {
        self.or(rhs)
    }
}

impl ops::BitOr<ValueKind> for TypeSpec {
    type Output = TypeSpec;

    fn bitor(self, rhs: ValueKind) -> TypeSpec {
        self.or(TypeSpec::Kind(rhs))
    }
}

impl ops::BitOr<TypeSpec> for ValueKind {
    type Output = TypeSpec;

    fn bitor(self, rhs: TypeSpec) -> TypeSpec {
        TypeSpec::Kind(self).or(rhs)
    }
}

impl ops::BitOr for ValueKind {
    type Output = TypeSpec;

    fn bitor(self, rhs: ValueKind) -> TypeSpec {
        TypeSpec::Kind(self).or(TypeSpec::Kind(rhs))
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::None => f.write_str("None"),
            TypeSpec::Kind(kind) => write!(f, "{}", kind),
            TypeSpec::Union(members) => write!(f, "{}", members.iter().join(" | ")),
        }
    }
}

impl FromStr for TypeSpec {
    type Err = ParseError;

    /// Parses the surface syntax `Display` produces, e.g. `"int | str | None"`.
    /// Whitespace around `|` is ignored; the absence marker is spelled `None`.
    fn from_str(s: &str) -> Result<TypeSpec, ParseError> {
        if s.trim().is_empty() {
            return Err(ParseError::new(s, ParseErrorKind::Empty));
        }
        let mut members = Vec::new();
        for part in s.split('|') {
            let part = part.trim();
            if part.is_empty() {
                return Err(ParseError::new(s, ParseErrorKind::EmptyUnionMember));
            }
            let member = if part == "None" {
                TypeSpec::None
            } else {
                match ValueKind::from_name(part) {
                    Some(kind) => TypeSpec::Kind(kind),
                    None => {
                        return Err(ParseError::new(
                            s,
                            ParseErrorKind::UnknownTypeName(part.to_string()),
                        ));
                    }
                }
            };
            members.push(member);
        }
        if members.len() == 1 {
            Ok(members.remove(0))
        } else {
            Ok(TypeSpec::Union(members))
        }
    }
}
