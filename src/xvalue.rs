use crate::shape::XShape;
use crate::xerror::{Io, XError};
use crate::xtype::{
    common_type, XFuncSpec, XKind, XStructSpec, XType, X_BOOL, X_FLOAT, X_INT, X_STR, X_UNIT,
};
use derivative::Derivative;
use derive_more::From;
use itertools::Itertools;
use std::fmt::{Display, Error, Formatter};
use std::iter;
use std::sync::Arc;

/// A single runtime value whose type is only known at construction.
///
/// Values are never mutated in place, every operation over them builds a new value.
#[derive(Debug, Clone, PartialEq, From)]
pub enum XValue {
    #[from(ignore)]
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Struct(XStruct),
    #[from(ignore)]
    Tuple(Vec<XValue>),
    Sequence(XSequence),
    Function(XFunction),
}

impl XValue {
    pub fn wrap<T: XNative>(value: T) -> XValue {
        value.into_xvalue()
    }

    /// Extract the stored value as `T`, failing if it was stored as anything else.
    pub fn unwrap<T: XNative>(self) -> Result<T, XError> {
        T::from_xvalue(self)
    }

    pub fn xtype(&self) -> Arc<XType> {
        match self {
            XValue::Unit => X_UNIT.clone(),
            XValue::Bool(_) => X_BOOL.clone(),
            XValue::Int(_) => X_INT.clone(),
            XValue::Float(_) => X_FLOAT.clone(),
            XValue::Str(_) => X_STR.clone(),
            XValue::Struct(s) => Arc::new(XType::Struct(s.spec.clone())),
            XValue::Tuple(items) => Arc::new(XType::Tuple(items.iter().map(XValue::xtype).collect())),
            XValue::Sequence(seq) => XType::sequence(seq.elem.clone()),
            XValue::Function(func) => func.spec.xtype(),
        }
    }

    pub fn kind(&self) -> XKind {
        match self {
            XValue::Unit => XKind::Unit,
            XValue::Bool(_) => XKind::Bool,
            XValue::Int(_) => XKind::Int,
            XValue::Float(_) => XKind::Float,
            XValue::Str(_) => XKind::Str,
            XValue::Struct(_) => XKind::Struct,
            XValue::Tuple(_) => XKind::Tuple,
            XValue::Sequence(_) => XKind::Sequence,
            XValue::Function(_) => XKind::Function,
        }
    }

    pub fn as_sequence(&self) -> Option<&XSequence> {
        match self {
            XValue::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&XFunction> {
        match self {
            XValue::Function(func) => Some(func),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            XValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl Display for XValue {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        match self {
            XValue::Unit => write!(f, "()"),
            XValue::Bool(b) => write!(f, "{}", b),
            XValue::Int(i) => write!(f, "{}", i),
            XValue::Float(x) => write!(f, "{}", x),
            XValue::Str(s) => write!(f, "{:?}", s),
            XValue::Struct(s) => write!(
                f,
                "{}{{{}}}",
                s.spec.name,
                s.spec
                    .fields
                    .iter()
                    .zip(s.fields.iter())
                    .map(|(spec, value)| format!("{}: {}", spec.name, value))
                    .join(", ")
            ),
            XValue::Tuple(items) => write!(f, "({})", items.iter().join(", ")),
            XValue::Sequence(seq) => write!(f, "[{}]", seq.items.iter().join(", ")),
            XValue::Function(func) => write!(f, "<fn {}>", func.spec.xtype()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct XStruct {
    spec: Arc<XStructSpec>,
    fields: Vec<XValue>,
}

impl XStruct {
    pub fn new(spec: Arc<XStructSpec>, fields: Vec<XValue>) -> Result<Self, XError> {
        if fields.len() != spec.fields.len() {
            return Err(XError::ArityMismatch {
                io: Io::Input,
                expected: spec.fields.len(),
                actual: fields.len(),
            });
        }
        for (field, value) in spec.fields.iter().zip(fields.iter()) {
            let actual = value.xtype();
            if actual != field.type_ {
                return Err(XError::TypeMismatch {
                    expected: field.type_.clone(),
                    actual,
                });
            }
        }
        Ok(Self { spec, fields })
    }

    pub fn spec(&self) -> &Arc<XStructSpec> {
        &self.spec
    }

    pub fn fields(&self) -> &[XValue] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&XValue> {
        self.spec.index_of(name).map(|idx| &self.fields[idx])
    }

    pub fn into_fields(self) -> Vec<XValue> {
        self.fields
    }

    #[doc(hidden)]
    pub fn from_native<T: XNative>(fields: Vec<XValue>) -> Self {
        let xtype = T::xtype();
        let XType::Struct(spec) = xtype.as_ref() else {
            unreachable!("xstruct! types always declare a struct type, got {}", xtype)
        };
        Self {
            spec: spec.clone(),
            fields,
        }
    }

    #[doc(hidden)]
    pub fn fields_of<T: XNative>(value: XValue) -> Result<Vec<XValue>, XError> {
        let expected = T::xtype();
        match value {
            XValue::Struct(s) if XType::Struct(s.spec.clone()) == *expected => Ok(s.fields),
            other => Err(XError::TypeMismatch {
                expected,
                actual: other.xtype(),
            }),
        }
    }
}

/// An ordered, homogeneous sequence. The element type is carried explicitly so
/// that an empty sequence still knows what it holds.
#[derive(Debug, Clone, PartialEq)]
pub struct XSequence {
    elem: Arc<XType>,
    items: Vec<XValue>,
}

impl XSequence {
    pub fn new(elem: Arc<XType>, items: Vec<XValue>) -> Result<Self, XError> {
        common_type(iter::once(elem.clone()).chain(items.iter().map(XValue::xtype)))?;
        Ok(Self { elem, items })
    }

    pub fn empty(elem: Arc<XType>) -> Self {
        Self {
            elem,
            items: vec![],
        }
    }

    // callers guarantee every item is of type `elem`
    pub(crate) fn from_parts(elem: Arc<XType>, items: Vec<XValue>) -> Self {
        debug_assert!(items.iter().all(|i| i.xtype() == elem));
        Self { elem, items }
    }

    pub fn elem(&self) -> &Arc<XType> {
        &self.elem
    }

    pub fn items(&self) -> &[XValue] {
        &self.items
    }

    pub fn into_items(self) -> Vec<XValue> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&XValue> {
        self.items.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &XValue> {
        self.items.iter()
    }
}

pub type NativeBody = dyn Fn(&[XValue]) -> XValue + Send + Sync;

/// A callable value: a declared signature and a native body.
///
/// The body is only ever handed arguments that match the declared parameters,
/// either through [`XFunction::call`] or after a shape check.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct XFunction {
    spec: XFuncSpec,
    #[derivative(Debug = "ignore")]
    body: Arc<NativeBody>,
}

macro_rules! from_fn {
    ($name:ident, $($arg:ident: $idx:tt),*) => {
        pub fn $name<$($arg: XNative,)* R: XNative, F>(func: F) -> Self
        where
            F: Fn($($arg),*) -> R + Send + Sync + 'static,
        {
            let spec = XFuncSpec::new(vec![$($arg::xtype()),*], R::output_types());
            Self::native(spec, move |_args: &[XValue]| {
                func($(native_arg::<$arg>(&_args[$idx])),*).into_xvalue()
            })
        }
    };
}

// only reached after the arguments were checked against the declared params
fn native_arg<T: XNative>(value: &XValue) -> T {
    match T::from_xvalue(value.clone()) {
        Ok(v) => v,
        Err(e) => panic!("native function received an unchecked argument: {}", e),
    }
}

impl XFunction {
    /// A function from a raw body. The body is trusted with its arguments but
    /// not with its result, which is checked against `spec.rets` on every call.
    pub fn native(
        spec: XFuncSpec,
        body: impl Fn(&[XValue]) -> XValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            spec,
            body: Arc::new(body),
        }
    }

    from_fn!(from_fn0,);
    from_fn!(from_fn1, A0: 0);
    from_fn!(from_fn2, A0: 0, A1: 1);
    from_fn!(from_fn3, A0: 0, A1: 1, A2: 2);
    from_fn!(from_fn4, A0: 0, A1: 1, A2: 2, A3: 3);

    pub fn spec(&self) -> &XFuncSpec {
        &self.spec
    }

    pub fn xtype(&self) -> Arc<XType> {
        self.spec.xtype()
    }

    /// Call the function, checking `args` against the declared parameters first.
    pub fn call(&self, args: &[XValue]) -> Result<XValue, XError> {
        XShape::of_args(args).check_inputs(&self.spec)?;
        self.invoke(args)
    }

    /// Run the body on already checked arguments. A body returning anything
    /// but its declared outputs is reported as a `TypeMismatch`.
    pub(crate) fn invoke(&self, args: &[XValue]) -> Result<XValue, XError> {
        let ret = (self.body)(args);
        let expected = self.spec.output_type();
        let actual = ret.xtype();
        if actual != expected {
            return Err(XError::TypeMismatch { expected, actual });
        }
        Ok(ret)
    }
}

impl PartialEq for XFunction {
    fn eq(&self, _: &Self) -> bool {
        false
    }
}

/// Rust types that have a fixed counterpart among the runtime types.
pub trait XNative: Sized {
    fn xtype() -> Arc<XType>;
    fn into_xvalue(self) -> XValue;
    fn from_xvalue(value: XValue) -> Result<Self, XError>;

    /// The declared return types of a function returning `Self`.
    fn output_types() -> Vec<Arc<XType>> {
        vec![Self::xtype()]
    }
}

fn mismatch<T: XNative>(actual: &XValue) -> XError {
    XError::TypeMismatch {
        expected: T::xtype(),
        actual: actual.xtype(),
    }
}

macro_rules! native_primitive {
    ($t:ty, $variant:ident, $xtype:ident) => {
        impl XNative for $t {
            fn xtype() -> Arc<XType> {
                $xtype.clone()
            }

            fn into_xvalue(self) -> XValue {
                XValue::$variant(self)
            }

            fn from_xvalue(value: XValue) -> Result<Self, XError> {
                match value {
                    XValue::$variant(v) => Ok(v),
                    other => Err(mismatch::<Self>(&other)),
                }
            }
        }
    };
}

native_primitive!(bool, Bool, X_BOOL);
native_primitive!(i64, Int, X_INT);
native_primitive!(f64, Float, X_FLOAT);
native_primitive!(String, Str, X_STR);

impl XNative for () {
    fn xtype() -> Arc<XType> {
        X_UNIT.clone()
    }

    fn into_xvalue(self) -> XValue {
        XValue::Unit
    }

    fn from_xvalue(value: XValue) -> Result<Self, XError> {
        match value {
            XValue::Unit => Ok(()),
            other => Err(mismatch::<Self>(&other)),
        }
    }

    fn output_types() -> Vec<Arc<XType>> {
        vec![]
    }
}

impl<T: XNative> XNative for Vec<T> {
    fn xtype() -> Arc<XType> {
        XType::sequence(T::xtype())
    }

    fn into_xvalue(self) -> XValue {
        XValue::Sequence(XSequence::from_parts(
            T::xtype(),
            self.into_iter().map(T::into_xvalue).collect(),
        ))
    }

    fn from_xvalue(value: XValue) -> Result<Self, XError> {
        match value {
            XValue::Sequence(seq) if seq.elem == T::xtype() => {
                seq.items.into_iter().map(T::from_xvalue).collect()
            }
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl<A: XNative, B: XNative> XNative for (A, B) {
    fn xtype() -> Arc<XType> {
        Arc::new(XType::Tuple(vec![A::xtype(), B::xtype()]))
    }

    fn into_xvalue(self) -> XValue {
        XValue::Tuple(vec![self.0.into_xvalue(), self.1.into_xvalue()])
    }

    fn from_xvalue(value: XValue) -> Result<Self, XError> {
        match value {
            XValue::Tuple(items) if items.len() == 2 => {
                let mut items = items.into_iter();
                match (items.next(), items.next()) {
                    (Some(a), Some(b)) => Ok((A::from_xvalue(a)?, B::from_xvalue(b)?)),
                    _ => unreachable!(),
                }
            }
            other => Err(mismatch::<Self>(&other)),
        }
    }

    fn output_types() -> Vec<Arc<XType>> {
        vec![A::xtype(), B::xtype()]
    }
}

/// Implement [`XNative`] for a plain struct, mapping it onto a runtime struct type
/// with the same name and fields.
///
/// ```
/// use xslice::xstruct;
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// xstruct!(Point { x: i64, y: i64 });
/// ```
#[macro_export]
macro_rules! xstruct {
    ($t:ident { $($field:ident : $ft:ty),* $(,)? }) => {
        impl $crate::xvalue::XNative for $t {
            fn xtype() -> ::std::sync::Arc<$crate::xtype::XType> {
                let spec = $crate::xtype::XStructSpec::new(
                    stringify!($t),
                    vec![$($crate::xtype::XFieldSpec::new(
                        stringify!($field),
                        <$ft as $crate::xvalue::XNative>::xtype(),
                    )),*],
                );
                match spec {
                    Ok(spec) => ::std::sync::Arc::new($crate::xtype::XType::Struct(
                        ::std::sync::Arc::new(spec),
                    )),
                    // a rust struct cannot repeat a field name
                    Err(e) => unreachable!("{}", e),
                }
            }

            fn into_xvalue(self) -> $crate::xvalue::XValue {
                $crate::xvalue::XValue::Struct($crate::xvalue::XStruct::from_native::<Self>(vec![
                    $($crate::xvalue::XNative::into_xvalue(self.$field)),*
                ]))
            }

            fn from_xvalue(
                value: $crate::xvalue::XValue,
            ) -> ::std::result::Result<Self, $crate::xerror::XError> {
                #[allow(unused_mut, unused_variables)]
                let mut fields = $crate::xvalue::XStruct::fields_of::<Self>(value)?.into_iter();
                Ok(Self {
                    $($field: <$ft as $crate::xvalue::XNative>::from_xvalue(
                        fields.next().unwrap_or($crate::xvalue::XValue::Unit),
                    )?),*
                })
            }
        }
    };
}
