use super::visit_log;
use std::sync::Arc;
use xslice::builtin::json;
use xslice::xstruct;
use xslice::xtype::{XType, X_BOOL, X_FLOAT, X_INT, X_STR};
use xslice::xvalue::{XFunction, XNative, XValue};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

xstruct!(Point { x: i64, y: i64 });

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub x: Point,
    pub y: Point,
}

xstruct!(Line { x: Point, y: Point });

pub fn element_type(name: &str) -> Arc<XType> {
    match name {
        "bool" => X_BOOL.clone(),
        "int" => X_INT.clone(),
        "float" => X_FLOAT.clone(),
        "str" => X_STR.clone(),
        "Point" => Point::xtype(),
        "Line" => Line::xtype(),
        other => panic!("unknown element type {other}"),
    }
}

fn visit<T: XNative>(value: T) {
    visit_log::record(json::encode(&value.into_xvalue()));
}

pub fn function(name: &str) -> XValue {
    let f = match name {
        "not_a_function" => return XValue::Int(3),

        "even_x" => XFunction::from_fn1(|p: Point| p.x % 2 == 0),
        "x_is_y" => XFunction::from_fn1(|p: Point| p.x == p.y),
        "x_of" => XFunction::from_fn1(|p: Point| p.x),
        "add_points" => {
            XFunction::from_fn2(|a: Point, b: Point| Point { x: a.x + b.x, y: a.y + b.y })
        }
        "point_eq" => XFunction::from_fn2(|a: Point, b: Point| a == b),
        "visit_point" => XFunction::from_fn1(visit::<Point>),
        "line_start" => XFunction::from_fn1(|l: Line| l.x),
        "flat_line" => XFunction::from_fn1(|l: Line| l.x.y == l.y.y),

        "is_positive" => XFunction::from_fn1(|x: i64| x > 0),
        "is_even" => XFunction::from_fn1(|x: i64| x % 2 == 0),
        "double" => XFunction::from_fn1(|x: i64| x * 2),
        "half" => XFunction::from_fn1(|x: i64| x as f64 / 2.0),
        "int_to_str" => XFunction::from_fn1(|x: i64| x.to_string()),
        "sum" => XFunction::from_fn2(|a: i64, b: i64| a + b),
        "int_eq" => XFunction::from_fn2(|a: i64, b: i64| a == b),
        "visit_int" => XFunction::from_fn1(visit::<i64>),
        "int_and_double" => XFunction::from_fn1(|x: i64| (x, x * 2)),
        "int_to_unit" => XFunction::from_fn1(|_: i64| {}),
        "int_sign" => XFunction::from_fn1(|x: i64| x.signum()),

        "non_empty" => XFunction::from_fn1(|s: String| !s.is_empty()),
        "str_len" => XFunction::from_fn1(|s: String| s.len() as i64),
        "concat" => XFunction::from_fn2(|a: String, b: String| a + &b),
        "str_eq_ignore_case" => {
            XFunction::from_fn2(|a: String, b: String| a.eq_ignore_ascii_case(&b))
        }

        "nothing" => XFunction::from_fn0(|| {}),
        other => panic!("unknown function {other}"),
    };
    XValue::Function(f)
}
