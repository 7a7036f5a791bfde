use crate::builtin::rejected;
use crate::shape::XShape;
use crate::xerror::XError;
use crate::xvalue::{XFunction, XValue};

/// A deferred call of a function with arguments captured up front.
#[derive(Debug, Clone)]
pub struct XThunk {
    func: XFunction,
    args: Vec<XValue>,
}

impl XThunk {
    /// Run the function on the captured arguments. May be called any number of
    /// times, each call runs the function again.
    ///
    /// A function with no outputs yields [`XValue::Unit`]. Fails only if the
    /// function body returns something other than its declared outputs.
    pub fn call(&self) -> Result<XValue, XError> {
        self.func.invoke(&self.args)
    }

    pub fn func(&self) -> &XFunction {
        &self.func
    }

    pub fn args(&self) -> &[XValue] {
        &self.args
    }
}

/// Bind `args` to `func` without calling it.
///
/// The parameter list `func` must accept is derived from the arguments
/// themselves, so a mismatch is reported here and never at call time.
pub fn apply(func: &XValue, args: Vec<XValue>) -> Result<XThunk, XError> {
    let func = XShape::of_args(&args)
        .validate_inputs_only(func)
        .map_err(rejected("apply"))?;
    Ok(XThunk {
        func: func.clone(),
        args,
    })
}
