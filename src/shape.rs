use crate::xerror::{Io, XError};
use crate::xtype::{XFuncSpec, XKind, XType};
use crate::xvalue::{XFunction, XValue};
use std::sync::Arc;

/// What a single parameter or return position must look like.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Slot {
    /// no check at this position
    Any,
    Kind(XKind),
    /// same category and same full type
    Exact(Arc<XType>),
}

impl Slot {
    fn check(&self, io: Io, position: usize, actual: &Arc<XType>) -> Result<(), XError> {
        let expected_kind = match self {
            Slot::Any => return Ok(()),
            Slot::Kind(kind) => *kind,
            Slot::Exact(t) => t.kind(),
        };
        if expected_kind != actual.kind() {
            return Err(XError::CategoryMismatch {
                io,
                position,
                expected: expected_kind,
                actual: actual.kind(),
            });
        }
        match self {
            Slot::Exact(t) if t != actual => Err(XError::TypeMismatch {
                expected: t.clone(),
                actual: actual.clone(),
            }),
            _ => Ok(()),
        }
    }
}

/// The ordered input and output slots a callable must satisfy.
/// The number of slots on each side is the required arity.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct XShape {
    pub inputs: Vec<Slot>,
    pub outputs: Vec<Slot>,
}

impl XShape {
    pub fn new(inputs: Vec<Slot>, outputs: Vec<Slot>) -> Self {
        Self { inputs, outputs }
    }

    /// `() -> ()`
    pub fn nullary() -> Self {
        Self::default()
    }

    /// `(elem) -> (bool)`
    pub fn predicate(elem: &Arc<XType>) -> Self {
        Self::new(vec![Slot::Exact(elem.clone())], vec![Slot::Kind(XKind::Bool)])
    }

    /// `(elem) -> ()`
    pub fn action(elem: &Arc<XType>) -> Self {
        Self::new(vec![Slot::Exact(elem.clone())], vec![])
    }

    /// `(elem) -> (?)`
    pub fn transform(elem: &Arc<XType>) -> Self {
        Self::new(vec![Slot::Exact(elem.clone())], vec![Slot::Any])
    }

    /// `(elem, elem) -> (output)`
    pub fn binary(elem: &Arc<XType>, output: Slot) -> Self {
        Self::new(
            vec![Slot::Exact(elem.clone()), Slot::Exact(elem.clone())],
            vec![output],
        )
    }

    /// Inputs exactly matching the types of `args`, outputs unchecked.
    pub fn of_args(args: &[XValue]) -> Self {
        Self::new(
            args.iter().map(|a| Slot::Exact(a.xtype())).collect(),
            vec![],
        )
    }

    /// Check that `callable` is a function satisfying both sides of this shape.
    /// Never invokes the function.
    pub fn validate<'a>(&self, callable: &'a XValue) -> Result<&'a XFunction, XError> {
        let func = as_callable(callable)?;
        self.check(func.spec())?;
        Ok(func)
    }

    /// Like [`XShape::validate`], but skipping the output arity and output slots.
    pub fn validate_inputs_only<'a>(&self, callable: &'a XValue) -> Result<&'a XFunction, XError> {
        let func = as_callable(callable)?;
        self.check_inputs(func.spec())?;
        Ok(func)
    }

    pub fn check(&self, spec: &XFuncSpec) -> Result<(), XError> {
        check_arity(Io::Input, self.inputs.len(), spec.params.len())?;
        check_arity(Io::Output, self.outputs.len(), spec.rets.len())?;
        check_slots(Io::Input, &self.inputs, &spec.params)?;
        check_slots(Io::Output, &self.outputs, &spec.rets)
    }

    pub fn check_inputs(&self, spec: &XFuncSpec) -> Result<(), XError> {
        check_arity(Io::Input, self.inputs.len(), spec.params.len())?;
        check_slots(Io::Input, &self.inputs, &spec.params)
    }
}

fn as_callable(value: &XValue) -> Result<&XFunction, XError> {
    value.as_function().ok_or_else(|| XError::NotCallable {
        actual: value.xtype(),
    })
}

fn check_arity(io: Io, expected: usize, actual: usize) -> Result<(), XError> {
    if expected != actual {
        return Err(XError::ArityMismatch {
            io,
            expected,
            actual,
        });
    }
    Ok(())
}

fn check_slots(io: Io, slots: &[Slot], actual: &[Arc<XType>]) -> Result<(), XError> {
    for (position, (slot, t)) in slots.iter().zip(actual.iter()).enumerate() {
        slot.check(io, position, t)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xtype::{X_BOOL, X_INT, X_STR};

    fn func(params: Vec<Arc<XType>>, rets: Vec<Arc<XType>>) -> XValue {
        XValue::Function(XFunction::native(XFuncSpec::new(params, rets), |_| {
            XValue::Unit
        }))
    }

    #[test]
    fn test_not_callable() {
        let err = XShape::nullary().validate(&XValue::Int(1)).unwrap_err();
        assert_eq!(
            err,
            XError::NotCallable {
                actual: X_INT.clone()
            }
        );
    }

    #[test]
    fn test_input_arity_checked_before_output_arity() {
        let f = func(vec![X_INT.clone(), X_INT.clone()], vec![]);
        let err = XShape::predicate(&X_INT).validate(&f).unwrap_err();
        assert_eq!(
            err,
            XError::ArityMismatch {
                io: Io::Input,
                expected: 1,
                actual: 2
            }
        );
    }

    #[test]
    fn test_output_arity() {
        let f = func(vec![X_INT.clone()], vec![X_INT.clone()]);
        let err = XShape::action(&X_INT).validate(&f).unwrap_err();
        assert_eq!(
            err,
            XError::ArityMismatch {
                io: Io::Output,
                expected: 0,
                actual: 1
            }
        );
        // outputs are not looked at at all
        assert!(XShape::action(&X_INT).validate_inputs_only(&f).is_ok());
    }

    #[test]
    fn test_categories() {
        let f = func(vec![X_STR.clone()], vec![X_BOOL.clone()]);
        assert_eq!(
            XShape::predicate(&X_INT).validate(&f).unwrap_err(),
            XError::CategoryMismatch {
                io: Io::Input,
                position: 0,
                expected: XKind::Int,
                actual: XKind::Str
            }
        );
        let f = func(vec![X_INT.clone()], vec![X_INT.clone()]);
        assert_eq!(
            XShape::predicate(&X_INT).validate(&f).unwrap_err(),
            XError::CategoryMismatch {
                io: Io::Output,
                position: 0,
                expected: XKind::Bool,
                actual: XKind::Int
            }
        );
    }

    #[test]
    fn test_wildcard() {
        let f = func(vec![X_INT.clone()], vec![X_STR.clone()]);
        assert!(XShape::transform(&X_INT).validate(&f).is_ok());
        let shape = XShape::new(vec![Slot::Any, Slot::Kind(XKind::Int)], vec![]);
        let f = func(vec![X_STR.clone(), X_INT.clone()], vec![]);
        assert!(shape.validate(&f).is_ok());
    }

    #[test]
    fn test_exact_type_after_category() {
        let ints = XType::sequence(X_INT.clone());
        let strs = XType::sequence(X_STR.clone());
        let f = func(vec![strs.clone()], vec![]);
        assert_eq!(
            XShape::action(&ints).validate(&f).unwrap_err(),
            XError::TypeMismatch {
                expected: ints,
                actual: strs
            }
        );
    }

    #[test]
    fn test_of_args() {
        let shape = XShape::of_args(&[XValue::Int(10), XValue::Str("10".to_string())]);
        let f = func(vec![X_INT.clone(), X_INT.clone()], vec![X_INT.clone()]);
        assert_eq!(
            shape.validate_inputs_only(&f).unwrap_err(),
            XError::CategoryMismatch {
                io: Io::Input,
                position: 1,
                expected: XKind::Str,
                actual: XKind::Int
            }
        );
    }
}
