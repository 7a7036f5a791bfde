mod utils;

use glob::glob;
use itertools::Itertools;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use stdext::function_name;
use xslice::builtin::json::{decode, encode};
use xslice::builtin::sequence::{
    compare, filter, filter_not, for_all, for_any, for_each, map, partition, reduce,
};
use xslice::xerror::XError;
use xslice::xtype::XType;

use crate::utils::fixtures::{element_type, function};
use crate::utils::{init_tracing, visit_log};

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct CaseConfig {
    op: String,
    element: String,
    input: Value,
    /// decode `input` as a single element rather than a sequence of them
    scalar: bool,
    func: String,
    initial: Option<Value>,
    initial_element: Option<String>,
    other: Option<Value>,
    other_element: Option<String>,
    expected: Option<Value>,
    expected_error: Option<String>,
    expected_visits: Option<Vec<Value>>,
}

impl CaseConfig {
    fn decode_as(&self, value: &Value, element: Option<&String>, scalar: bool) -> xslice::XValue {
        let elem = element_type(element.unwrap_or(&self.element));
        let xtype = if scalar { elem } else { XType::sequence(elem) };
        decode(value, &xtype).unwrap_or_else(|e| panic!("bad case data: {e}"))
    }

    fn evaluate(&self) -> Result<Value, XError> {
        let input = self.decode_as(&self.input, None, self.scalar);
        let func = function(&self.func);
        match self.op.as_str() {
            "filter" => filter(&input, &func).map(|v| encode(&v)),
            "filter_not" => filter_not(&input, &func).map(|v| encode(&v)),
            "partition" => partition(&input, &func)
                .map(|(matching, rest)| Value::Array(vec![encode(&matching), encode(&rest)])),
            "for_all" => for_all(&input, &func).map(Value::Bool),
            "for_any" => for_any(&input, &func).map(Value::Bool),
            "for_each" => for_each(&input, &func).map(|()| Value::Null),
            "map" => map(&input, &func).map(|v| encode(&v)),
            "reduce" => {
                let initial = self.decode_as(
                    self.initial.as_ref().expect("reduce needs an initial value"),
                    self.initial_element.as_ref(),
                    true,
                );
                reduce(&initial, &input, &func).map(|v| encode(&v))
            }
            "compare" => {
                let other = self.decode_as(
                    self.other.as_ref().expect("compare needs an other sequence"),
                    self.other_element.as_ref(),
                    false,
                );
                compare(&input, &other, &func).map(Value::Bool)
            }
            other => panic!("unknown op {other}"),
        }
    }

    fn run(&self) {
        init_tracing();
        visit_log::take();
        let result = self.evaluate();
        let visits = visit_log::take();

        match (result, &self.expected_error) {
            (Ok(actual), None) => {
                if let Some(expected) = &self.expected {
                    assert_eq!(expected, &actual)
                }
            }
            (Ok(actual), Some(pat)) => panic!("expected error {pat}, got {actual}"),
            (Err(e), Some(pat)) => {
                let pat = Regex::new(pat).unwrap();
                let description = format!("{}: {e}", e.name());
                if !pat.is_match(&description) {
                    panic!("expected error that matches {pat:?}, got \"{description}\"")
                }
            }
            (Err(e), None) => panic!("unexpected error: {e}"),
        }

        if let Some(expected_visits) = &self.expected_visits {
            assert_eq!(expected_visits, &visits)
        }
    }
}

fn test_case(case_number: usize) {
    let file_pattern = format!("test_cases/{case_number:0>3}_*.toml");
    let file_path = glob(&file_pattern)
        .unwrap()
        .exactly_one()
        .map_err(|e| {
            format!(
                "multiple files matched {file_pattern}: {}",
                e.map(|b| format!("{b:?}")).join(", ")
            )
        })
        .unwrap()
        .unwrap();
    let content = fs::read_to_string(&file_path)
        .unwrap_or_else(|_| panic!("{}", file_path.to_str().unwrap().to_string()));
    let config: CaseConfig = toml::from_str(&content).unwrap();
    config.run();
}

fn run_case_from_name(fn_name: &str) {
    let case_number = fn_name[fn_name.len() - 3..].parse().unwrap();
    test_case(case_number)
}

#[test]
fn test_case_001() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_002() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_003() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_004() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_005() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_006() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_007() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_008() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_009() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_010() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_011() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_012() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_013() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_014() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_015() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_016() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_017() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_018() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_019() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_020() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_021() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_022() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_023() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_024() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_025() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_026() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_027() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_028() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_029() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_030() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_031() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_032() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_033() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_034() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_035() {
    run_case_from_name(function_name!());
}

#[test]
fn test_case_036() {
    run_case_from_name(function_name!());
}
