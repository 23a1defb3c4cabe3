/// Error parsing a type expression such as `"int | str | None"`.
#[derive(Debug, thiserror::Error)]
#[error("failed to parse `{input}` as a type expression: {kind}")]
pub struct ParseError {
    input: String,
    kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(input: &str, kind: ParseErrorKind) -> ParseError {
        ParseError {
            input: input.to_string(),
            kind,
        }
    }

    /// The kind of error that occurred.
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// The original input that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// The kind of `ParseError`.
#[non_exhaustive]
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("type expression is empty")]
    Empty,

    #[error("empty member in type union")]
    EmptyUnionMember,

    #[error("unknown type name `{0}`")]
    UnknownTypeName(String),
}
