use crate::xtype::{XKind, XType};
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use strum::IntoStaticStr;

/// Which side of a signature a failed check is about.
#[derive(Debug, Eq, PartialEq, Clone, Copy, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Io {
    Input,
    Output,
}

// validation failures, reported to the immediate caller and never retried
#[derive(Debug, Eq, PartialEq, Clone, IntoStaticStr)]
pub enum XError {
    NotASequence {
        actual: Arc<XType>,
    },
    NotCallable {
        actual: Arc<XType>,
    },
    ArityMismatch {
        io: Io,
        expected: usize,
        actual: usize,
    },
    CategoryMismatch {
        io: Io,
        position: usize,
        expected: XKind,
        actual: XKind,
    },
    TypeMismatch {
        expected: Arc<XType>,
        actual: Arc<XType>,
    },
    DuplicateField {
        name: String,
        field: String,
    },
}

impl XError {
    /// The variant name, e.g. `"ArityMismatch"`.
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

impl Display for XError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            XError::NotASequence { actual } => {
                write!(f, "expected a sequence, received {}", actual)
            }
            XError::NotCallable { actual } => {
                write!(f, "value of type {} is not a function", actual)
            }
            XError::ArityMismatch {
                io,
                expected,
                actual,
            } => {
                let io: &'static str = io.into();
                write!(
                    f,
                    "invalid arity, expected {} {} params, received {}",
                    expected, io, actual
                )
            }
            XError::CategoryMismatch {
                io,
                position,
                expected,
                actual,
            } => {
                let io: &'static str = io.into();
                write!(
                    f,
                    "invalid {} kind at param {}, expected {}, received {}",
                    io, position, expected, actual
                )
            }
            XError::TypeMismatch { expected, actual } => {
                write!(f, "type mismatch, expected {}, received {}", expected, actual)
            }
            XError::DuplicateField { name, field } => {
                write!(f, "duplicate field {} in struct {}", field, name)
            }
        }
    }
}

impl std::error::Error for XError {}
