use crate::xerror::XError;
use itertools::Itertools;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use strum::IntoStaticStr;

/// The closed set of categories a value can fall into.
///
/// Shape checks compare categories first and only then, where a slot asks for
/// it, the full [`XType`].
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum XKind {
    Unit,
    Bool,
    Int,
    Float,
    Str,
    Struct,
    Tuple,
    Sequence,
    Function,
}

impl Display for XKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name: &'static str = self.into();
        f.write_str(name)
    }
}

#[derive(Debug, Eq, PartialEq, Hash)]
pub enum XType {
    Unit,
    Bool,
    Int,
    Float,
    Str,
    Struct(Arc<XStructSpec>),
    Tuple(Vec<Arc<XType>>),
    Sequence(Arc<XType>),
    Func(XFuncSpec),
}

#[derive(Clone, Hash, Debug, Eq, PartialEq)]
pub struct XStructSpec {
    pub name: String,
    pub fields: Vec<XFieldSpec>,
    pub indices: BTreeMap<String, usize>,
}

impl XStructSpec {
    /// Field names must be unique, a repeated name is a `DuplicateField`.
    pub fn new(name: impl Into<String>, fields: Vec<XFieldSpec>) -> Result<XStructSpec, XError> {
        let name = name.into();
        let mut indices = BTreeMap::new();
        for (i, field) in fields.iter().enumerate() {
            if indices.insert(field.name.clone(), i).is_some() {
                return Err(XError::DuplicateField {
                    name,
                    field: field.name.clone(),
                });
            }
        }
        Ok(XStructSpec {
            name,
            fields,
            indices,
        })
    }

    pub fn empty(name: impl Into<String>) -> XStructSpec {
        XStructSpec {
            name: name.into(),
            fields: vec![],
            indices: BTreeMap::new(),
        }
    }

    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.indices.get(field).copied()
    }
}

#[derive(Clone, Hash, Debug, Eq, PartialEq)]
pub struct XFieldSpec {
    pub name: String,
    pub type_: Arc<XType>,
}

impl XFieldSpec {
    pub fn new(name: impl Into<String>, type_: Arc<XType>) -> Self {
        Self {
            name: name.into(),
            type_,
        }
    }
}

/// Declared signature of a callable: ordered parameter types and ordered return types.
/// A function with no return types is called for its side effects only.
#[derive(Clone, Hash, Debug, Eq, PartialEq)]
pub struct XFuncSpec {
    pub params: Vec<Arc<XType>>,
    pub rets: Vec<Arc<XType>>,
}

impl XFuncSpec {
    pub fn new(params: Vec<Arc<XType>>, rets: Vec<Arc<XType>>) -> Self {
        Self { params, rets }
    }

    /// The type of the single value a call produces: `()` when nothing is
    /// returned, a tuple when several values are.
    pub fn output_type(&self) -> Arc<XType> {
        match self.rets.as_slice() {
            [] => X_UNIT.clone(),
            [ret] => ret.clone(),
            rets => Arc::new(XType::Tuple(rets.to_vec())),
        }
    }

    pub fn xtype(&self) -> Arc<XType> {
        Arc::new(XType::Func(self.clone()))
    }
}

impl XType {
    pub fn kind(&self) -> XKind {
        match self {
            XType::Unit => XKind::Unit,
            XType::Bool => XKind::Bool,
            XType::Int => XKind::Int,
            XType::Float => XKind::Float,
            XType::Str => XKind::Str,
            XType::Struct(_) => XKind::Struct,
            XType::Tuple(_) => XKind::Tuple,
            XType::Sequence(_) => XKind::Sequence,
            XType::Func(_) => XKind::Function,
        }
    }

    pub fn sequence(elem: Arc<XType>) -> Arc<XType> {
        Arc::new(XType::Sequence(elem))
    }

    pub fn func(params: Vec<Arc<XType>>, rets: Vec<Arc<XType>>) -> Arc<XType> {
        XFuncSpec::new(params, rets).xtype()
    }

    /// The element type, if this is a sequence type.
    pub fn elem(&self) -> Option<&Arc<XType>> {
        match self {
            XType::Sequence(elem) => Some(elem),
            _ => None,
        }
    }
}

impl Display for XType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            XType::Unit => write!(f, "()"),
            XType::Bool => write!(f, "bool"),
            XType::Int => write!(f, "int"),
            XType::Float => write!(f, "float"),
            XType::Str => write!(f, "str"),
            XType::Struct(spec) => write!(f, "{}", spec.name),
            XType::Tuple(items) => write!(f, "({})", items.iter().join(", ")),
            XType::Sequence(elem) => write!(f, "[{}]", elem),
            XType::Func(spec) => write!(
                f,
                "({})->({})",
                spec.params.iter().join(", "),
                spec.rets.iter().join(", ")
            ),
        }
    }
}

lazy_static! {
    pub static ref X_UNIT: Arc<XType> = Arc::new(XType::Unit);
    pub static ref X_BOOL: Arc<XType> = Arc::new(XType::Bool);
    pub static ref X_INT: Arc<XType> = Arc::new(XType::Int);
    pub static ref X_FLOAT: Arc<XType> = Arc::new(XType::Float);
    pub static ref X_STR: Arc<XType> = Arc::new(XType::Str);
}

/// The single type shared by every item of `values`, `None` if `values` is empty.
pub fn common_type<T: Iterator<Item = Arc<XType>>>(
    mut values: T,
) -> Result<Option<Arc<XType>>, XError> {
    let ret = match values.next() {
        None => return Ok(None),
        Some(v) => v,
    };
    for v in values {
        if ret != v {
            return Err(XError::TypeMismatch {
                expected: ret,
                actual: v,
            });
        }
    }
    Ok(Some(ret))
}
