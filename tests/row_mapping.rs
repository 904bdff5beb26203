mod common;

use common::{employee_table, interface, registry, ScriptedEngine};
use oqlmap::OqlError;
use oqlmap::datatype::{Identifier, Value};
use oqlmap::interface::QueryInterface;
use oqlmap::parameter::ParameterScope;
use oqlmap::settings::Settings;
use oqlmap::store::MemoryStore;
use oqlmap::table::{ColumnDescriptor, ResultTable, Row};

#[test]
fn rows_map_to_objects_in_order() {
    let iface = interface(employee_table());
    let mut scope = ParameterScope::new();
    let objects = iface
        .execute(&mut scope, "SELECT e.Name, e.Team FROM Employee e", "HR.EmployeeResult", None, 0, false)
        .expect("query ok");
    assert_eq!(objects.len(), 2);
    assert_eq!(objects[0].attribute("Name"), Some(&Value::from("Ann")));
    assert_eq!(objects[0].relationship("HR.Team"), Some(Identifier(42)));
    assert_eq!(objects[1].attribute("Name"), Some(&Value::from("Bo")));
    assert_eq!(objects[1].relationship("HR.Team"), Some(Identifier(7)));
    assert!(objects.iter().all(|o| o.entity() == "HR.EmployeeResult"));
}

#[test]
fn pagination_is_forwarded() {
    let iface = interface(employee_table());
    let mut scope = ParameterScope::new();
    let objects = iface
        .execute(&mut scope, "SELECT e.Name, e.Team FROM Employee e", "HR.EmployeeResult", Some(1), 1, false)
        .unwrap();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].attribute("Name"), Some(&Value::from("Bo")));
}

#[test]
fn unmatched_column_aborts_the_whole_mapping() {
    let table = ResultTable::with_rows(
        vec![ColumnDescriptor::scalar("Name"), ColumnDescriptor::scalar("Nickname")],
        vec![
            Row(vec![Some(Value::from("Ann")), None]),
            Row(vec![Some(Value::from("Bo")), Some(Value::from("B"))]),
        ],
    )
    .unwrap();
    let iface = interface(table);
    let mut scope = ParameterScope::new();
    let err = iface
        .execute(&mut scope, "SELECT e.Name, e.Nickname FROM Employee e", "HR.EmployeeResult", None, 0, false)
        .unwrap_err();
    match err {
        OqlError::MissingAttribute { entity, column } => {
            assert_eq!(entity, "HR.EmployeeResult");
            assert_eq!(column, "Nickname");
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn unmatched_reference_column_is_missing_relationship() {
    let table = ResultTable::with_rows(
        vec![ColumnDescriptor::reference("Department")],
        vec![Row(vec![Some(Value::Identifier(Identifier(1)))])],
    )
    .unwrap();
    let iface = interface(table);
    let err = iface
        .execute(&mut ParameterScope::new(), "SELECT e.Department FROM Employee e", "HR.EmployeeResult", None, 0, false)
        .unwrap_err();
    assert!(matches!(err, OqlError::MissingRelationship { .. }));
}

#[test]
fn ambiguous_association_follows_settings() {
    let table = ResultTable::with_rows(
        vec![ColumnDescriptor::reference("EmployeeResult_Manager")],
        vec![Row(vec![Some(Value::Identifier(Identifier(5)))])],
    )
    .unwrap();
    let statement = "SELECT e.Manager AS EmployeeResult_Manager FROM Employee e";

    let iface = interface(table.clone());
    let err = iface.execute(&mut ParameterScope::new(), statement, "HR.EmployeeResult", None, 0, false).unwrap_err();
    assert!(matches!(err, OqlError::AmbiguousRelationship { .. }));

    let settings = Settings::from_toml("ambiguity_policy = \"first_match\"").unwrap();
    let lenient = QueryInterface::from_settings(ScriptedEngine::returning(table), MemoryStore::new(), registry(), &settings);
    let objects = lenient.execute(&mut ParameterScope::new(), statement, "HR.EmployeeResult", None, 0, false).unwrap();
    assert_eq!(objects[0].relationship("HR.EmployeeResult_Manager"), Some(Identifier(5)));
}

#[test]
fn wide_values_narrow_or_overflow() {
    let fits = ResultTable::with_rows(
        vec![ColumnDescriptor::scalar("Age"), ColumnDescriptor::scalar("Salary")],
        vec![Row(vec![Some(Value::Long(41)), Some(Value::Integer(5))])],
    )
    .unwrap();
    let objects = interface(fits)
        .execute(&mut ParameterScope::new(), "SELECT e.Age, e.Salary FROM Employee e", "HR.EmployeeResult", None, 0, false)
        .unwrap();
    assert_eq!(objects[0].attribute("Age"), Some(&Value::Integer(41)));
    assert_eq!(objects[0].attribute("Salary"), Some(&Value::Long(5)));

    let overflowing = ResultTable::with_rows(
        vec![ColumnDescriptor::scalar("Age")],
        vec![Row(vec![Some(Value::Long(1))]), Row(vec![Some(Value::Long(9_999_999_999))])],
    )
    .unwrap();
    let err = interface(overflowing)
        .execute(&mut ParameterScope::new(), "SELECT e.Age FROM Employee e", "HR.EmployeeResult", None, 0, false)
        .unwrap_err();
    assert!(matches!(err, OqlError::NumericOverflow { value: 9_999_999_999, .. }));
}

#[test]
fn null_values_are_skipped_by_default() {
    let table = ResultTable::with_rows(
        vec![ColumnDescriptor::scalar("Name"), ColumnDescriptor::reference("Team")],
        vec![Row(vec![Some(Value::from("Ann")), None])],
    )
    .unwrap();
    let objects = interface(table)
        .execute(&mut ParameterScope::new(), "SELECT e.Name, e.Team FROM Employee e", "HR.EmployeeResult", None, 0, false)
        .unwrap();
    assert_eq!(objects.len(), 1);
    assert!(objects[0].relationship("HR.Team").is_none());
}
