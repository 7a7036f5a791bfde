//! Higher-order operations over homogeneous sequences, with callables that are
//! checked against the shape each operation requires before they are invoked.
//!
//! Two layers are provided. The dynamic one ([`builtin`]) works on [`XValue`]s
//! whose types are only known at runtime and reports mismatches as [`XError`]s.
//! The typed one ([`generic`]) is the same set of operations over plain slices
//! and closures.

#[macro_use]
extern crate lazy_static;
extern crate derivative;

#[macro_use]
pub mod builtin;
pub mod generic;
pub mod shape;
pub mod xerror;
pub mod xtype;
pub mod xvalue;

pub use crate::builtin::apply::{apply, XThunk};
pub use crate::builtin::repeat::{
    repeat, repeat_fn, repeat_fn_with, repeat_with, CancelToken, RepeatConfig, RepeatHandle,
    RepeatStatus,
};
pub use crate::builtin::sequence::{
    compare, filter, filter_not, for_all, for_any, for_each, map, partition, reduce,
};
pub use crate::generic::SliceOps;
pub use crate::shape::{Slot, XShape};
pub use crate::xerror::{Io, XError};
pub use crate::xtype::{XFieldSpec, XFuncSpec, XKind, XStructSpec, XType};
pub use crate::xvalue::{XFunction, XNative, XSequence, XStruct, XValue};
