//! Filter, FilterNot, ForAll, ForAny, ForEach, Map, Reduce and Compare over
//! dynamically typed sequences.
//!
//! Every operation checks its arguments completely before touching a single
//! element: a non-sequence or a callable of the wrong shape never causes a
//! partial traversal. A callable whose body then returns something other than
//! its declared outputs stops the traversal with a `TypeMismatch`.

use crate::builtin::rejected;
use crate::shape::{Slot, XShape};
use crate::xerror::XError;
use crate::xtype::XKind;
use crate::xvalue::{XFunction, XSequence, XValue};
use either::Either;
use itertools::{process_results, Itertools};
use std::slice;
use tracing::trace;

fn sequence_arg<'a>(op: &'static str, value: &'a XValue) -> Result<&'a XSequence, XError> {
    value
        .as_sequence()
        .ok_or_else(|| XError::NotASequence {
            actual: value.xtype(),
        })
        .map_err(rejected(op))
}

fn test(pred: &XFunction, item: &XValue) -> Result<bool, XError> {
    Ok(to_primitive!(pred.invoke(slice::from_ref(item))?, Bool))
}

fn filter_by(op: &'static str, seq: &XValue, pred: &XValue, keep: bool) -> Result<XValue, XError> {
    let seq = sequence_arg(op, seq)?;
    let pred = XShape::predicate(seq.elem())
        .validate(pred)
        .map_err(rejected(op))?;
    trace!(op, len = seq.len(), "traversing");
    let mut items = vec![];
    for item in seq.iter() {
        if test(pred, item).map_err(rejected(op))? == keep {
            items.push(item.clone());
        }
    }
    Ok(XSequence::from_parts(seq.elem().clone(), items).into())
}

/// The elements of `seq` for which `pred` holds, in their original order.
pub fn filter(seq: &XValue, pred: &XValue) -> Result<XValue, XError> {
    filter_by("filter", seq, pred, true)
}

/// The elements of `seq` for which `pred` does not hold, in their original order.
pub fn filter_not(seq: &XValue, pred: &XValue) -> Result<XValue, XError> {
    filter_by("filter_not", seq, pred, false)
}

/// Filter and FilterNot in a single traversal.
pub fn partition(seq: &XValue, pred: &XValue) -> Result<(XValue, XValue), XError> {
    let seq = sequence_arg("partition", seq)?;
    let pred = XShape::predicate(seq.elem())
        .validate(pred)
        .map_err(rejected("partition"))?;
    trace!(op = "partition", len = seq.len(), "traversing");
    let sides = seq.iter().map(|item| -> Result<_, XError> {
        Ok(if test(pred, item)? {
            Either::Left(item.clone())
        } else {
            Either::Right(item.clone())
        })
    });
    let (matching, rest): (Vec<_>, Vec<_>) =
        process_results(sides, |sides| sides.partition_map(|side| side))
            .map_err(rejected("partition"))?;
    Ok((
        XSequence::from_parts(seq.elem().clone(), matching).into(),
        XSequence::from_parts(seq.elem().clone(), rest).into(),
    ))
}

fn quantify(op: &'static str, seq: &XValue, pred: &XValue, all: bool) -> Result<bool, XError> {
    let seq = sequence_arg(op, seq)?;
    let pred = XShape::predicate(seq.elem())
        .validate(pred)
        .map_err(rejected(op))?;
    trace!(op, len = seq.len(), "traversing");
    for item in seq.iter() {
        if test(pred, item).map_err(rejected(op))? != all {
            return Ok(!all);
        }
    }
    Ok(all)
}

/// Whether `pred` holds for every element, stopping at the first that fails.
/// `true` for an empty sequence.
pub fn for_all(seq: &XValue, pred: &XValue) -> Result<bool, XError> {
    quantify("for_all", seq, pred, true)
}

/// Whether `pred` holds for some element, stopping at the first that does.
/// `false` for an empty sequence.
pub fn for_any(seq: &XValue, pred: &XValue) -> Result<bool, XError> {
    quantify("for_any", seq, pred, false)
}

/// Call `action` on every element in order. `action` must declare no outputs.
pub fn for_each(seq: &XValue, action: &XValue) -> Result<(), XError> {
    let seq = sequence_arg("for_each", seq)?;
    let action = XShape::action(seq.elem())
        .validate(action)
        .map_err(rejected("for_each"))?;
    trace!(op = "for_each", len = seq.len(), "traversing");
    for item in seq.iter() {
        action
            .invoke(slice::from_ref(item))
            .map_err(rejected("for_each"))?;
    }
    Ok(())
}

/// Apply `transform` to every element.
///
/// The element type of the result is the declared return type of `transform`,
/// so mapping an empty sequence still produces a correctly typed empty sequence.
pub fn map(seq: &XValue, transform: &XValue) -> Result<XValue, XError> {
    let seq = sequence_arg("map", seq)?;
    let transform = XShape::transform(seq.elem())
        .validate(transform)
        .map_err(rejected("map"))?;
    let ret = transform.spec().output_type();
    trace!(op = "map", len = seq.len(), ret = %ret, "traversing");
    let items = seq
        .iter()
        .map(|item| transform.invoke(slice::from_ref(item)))
        .collect::<Result<Vec<_>, _>>()
        .map_err(rejected("map"))?;
    Ok(XSequence::from_parts(ret, items).into())
}

/// Left fold of `seq` with `combine`, starting from `initial`.
///
/// `initial`, the elements, both parameters of `combine` and its single output
/// must all share one type. An empty sequence yields `initial`.
pub fn reduce(initial: &XValue, seq: &XValue, combine: &XValue) -> Result<XValue, XError> {
    let seq = sequence_arg("reduce", seq)?;
    let acc_type = initial.xtype();
    if acc_type != *seq.elem() {
        return Err(XError::TypeMismatch {
            expected: seq.elem().clone(),
            actual: acc_type,
        })
        .map_err(rejected("reduce"));
    }
    let combine = XShape::binary(seq.elem(), Slot::Exact(seq.elem().clone()))
        .validate(combine)
        .map_err(rejected("reduce"))?;
    trace!(op = "reduce", len = seq.len(), "traversing");
    seq.iter()
        .try_fold(initial.clone(), |acc, item| {
            combine.invoke(&[acc, item.clone()])
        })
        .map_err(rejected("reduce"))
}

/// Element-wise comparison of two sequences with `eq`.
///
/// Sequences of different lengths are simply unequal, that is not an error.
pub fn compare(this: &XValue, that: &XValue, eq: &XValue) -> Result<bool, XError> {
    let this = sequence_arg("compare", this)?;
    let that = sequence_arg("compare", that)?;
    if this.elem() != that.elem() {
        return Err(XError::TypeMismatch {
            expected: this.elem().clone(),
            actual: that.elem().clone(),
        })
        .map_err(rejected("compare"));
    }
    let eq = XShape::binary(this.elem(), Slot::Kind(XKind::Bool))
        .validate(eq)
        .map_err(rejected("compare"))?;
    if this.len() != that.len() {
        return Ok(false);
    }
    trace!(op = "compare", len = this.len(), "traversing");
    for (a, b) in this.iter().zip(that.iter()) {
        let same = eq
            .invoke(&[a.clone(), b.clone()])
            .map_err(rejected("compare"))?;
        if !to_primitive!(same, Bool) {
            return Ok(false);
        }
    }
    Ok(true)
}
