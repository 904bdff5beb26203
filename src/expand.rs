//! Expansion of list-valued parameters into positional scalars.
//!
//! The query language has no way to bind a list, so a statement such as
//! `... WHERE e.Team IN ($TeamList)` with `TeamList = [1, 2, 3]` is rewritten
//! to `... WHERE e.Team IN ($TeamList_0,$TeamList_1,$TeamList_2)` and the list
//! is replaced by the three scalar parameters `TeamList_0..TeamList_2`.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use tracing::debug;

use crate::datatype::{ParameterValue, Value};
use crate::error::{OqlError, Result};
use crate::parameter::ParameterScope;

lazy_static! {
    // a placeholder always runs to the end of the identifier, so $Employee
    // never matches the prefix of $EmployeeList
    static ref PLACEHOLDER: Regex = Regex::new(r"\$(\w+)").unwrap();
    static ref PARAMETER_NAME: Regex = Regex::new(r"^\w+$").unwrap();
}

/// A statement and parameter map ready for the query engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedQuery {
    pub statement: String,
    pub parameters: BTreeMap<String, Value>,
}

fn generated_name(name: &str, index: usize) -> String {
    format!("{}_{}", name, index)
}

/// Rewrites `statement` so that every list parameter in `scope` becomes a
/// comma separated run of indexed scalar placeholders.
pub fn expand(statement: &str, scope: &ParameterScope) -> Result<ExpandedQuery> {
    let mut parameters = BTreeMap::new();
    let mut lists: BTreeMap<&str, &Vec<Value>> = BTreeMap::new();
    for (name, value) in scope {
        match value {
            ParameterValue::Scalar(v) => {
                parameters.insert(name.clone(), v.clone());
            }
            ParameterValue::List(values) => {
                if !PARAMETER_NAME.is_match(name) {
                    return Err(OqlError::MalformedParameterExpansion(format!(
                        "list parameter '{}' cannot be written as a placeholder",
                        name
                    )));
                }
                if values.is_empty() {
                    return Err(OqlError::MalformedParameterExpansion(format!(
                        "list parameter {} is empty",
                        name
                    )));
                }
                lists.insert(name.as_str(), values);
            }
        }
    }
    if lists.is_empty() {
        return Ok(ExpandedQuery { statement: statement.to_string(), parameters });
    }

    for (name, values) in &lists {
        for (i, value) in values.iter().enumerate() {
            let generated = generated_name(name, i);
            if parameters.insert(generated.clone(), value.clone()).is_some() {
                return Err(OqlError::MalformedParameterExpansion(format!(
                    "parameter {} generated from list {} is already staged",
                    generated, name
                )));
            }
        }
    }

    let mut occurrences: BTreeMap<&str, usize> = BTreeMap::new();
    let rewritten = PLACEHOLDER.replace_all(statement, |caps: &Captures| {
        match lists.get_key_value(&caps[1]) {
            Some((name, values)) => {
                *occurrences.entry(*name).or_insert(0) += 1;
                (0..values.len())
                    .map(|i| format!("${}", generated_name(name, i)))
                    .collect::<Vec<_>>()
                    .join(",")
            }
            None => caps[0].to_string(),
        }
    });

    for (name, values) in &lists {
        let expected = occurrences.get(name).copied().unwrap_or(0) * values.len();
        if expected == 0 {
            debug!(parameter = %name, "list parameter is not referenced by the statement");
        }
        let found = PLACEHOLDER
            .captures_iter(&rewritten)
            .filter(|caps| is_generated_from(&caps[1], name, values.len()))
            .count();
        if found != expected {
            return Err(OqlError::MalformedParameterExpansion(format!(
                "expected {} placeholders for list {} but the statement holds {}",
                expected, name, found
            )));
        }
        debug!(parameter = %name, count = values.len(), "expanded list parameter");
    }

    Ok(ExpandedQuery { statement: rewritten.into_owned(), parameters })
}

fn is_generated_from(placeholder: &str, name: &str, count: usize) -> bool {
    placeholder
        .strip_prefix(name)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|index| index.parse::<usize>().ok())
        .is_some_and(|index| index < count && generated_name(name, index) == placeholder)
}
