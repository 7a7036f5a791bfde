macro_rules! to_primitive {
    ($x: expr, $v: ident) => {
        match $x {
            $crate::xvalue::XValue::$v(__b) => __b,
            other => panic!(
                "error when converting primitive, expected {}, got {:?}",
                stringify!($v),
                other
            ),
        }
    };
}

use crate::xerror::XError;
use tracing::debug;

/// Log a rejected argument of `op` and pass the error on.
pub(crate) fn rejected(op: &'static str) -> impl Fn(XError) -> XError {
    move |e| {
        debug!(op, error = %e, "rejected arguments");
        e
    }
}

pub mod apply;
pub mod json;
pub mod repeat;
pub mod sequence;
