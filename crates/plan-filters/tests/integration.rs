//! Integration tests for filters inside core schemas
//!
//! Tests filters composed with:
//! - Dictionaries with required keys
//! - Sequences of values
//! - Alternation and chaining

use plan_core::assert::{email, integer, length};
use plan_core::combinator::{all, any, dict, seq, Extra, Required};
use plan_core::{Kind, Plan, Schema, Value};
use plan_filters::{cast, datetime, intl, sanitize, upload};
use proptest::prelude::*;
use serde_json::json;

/// Helper to build a signup form schema out of filters and assertions
fn signup_schema() -> Schema {
    dict(
        [
            (
                "email",
                Schema::from(all([sanitize::email(), email()]).unwrap()),
            ),
            (
                "age",
                all([cast::to(Kind::Int).unwrap(), integer()]).unwrap().into(),
            ),
            (
                "nick",
                all([intl::alnum(false).unwrap(), length(Some(3), None).unwrap()])
                    .unwrap()
                    .into(),
            ),
            ("born", datetime::assert("%Y-%m-%d", true).unwrap().into()),
        ],
        Required::All,
        Extra::Deny,
    )
    .unwrap()
    .into()
}

#[test]
fn test_signup_form_is_normalized() {
    let plan = Plan::new(signup_schema()).unwrap();
    let input = Value::from(json!({
        "email": " john (at work)@example.org ",
        "age": "42",
        "nick": "j.o.h.n!",
        "born": "1982-05-17",
    }));

    let output = plan.validate(&input).unwrap();
    assert_eq!(
        output,
        Value::from(json!({
            "email": "johnatwork@example.org",
            "age": 42,
            "nick": "john",
            "born": "1982-05-17",
        }))
    );
}

#[test]
fn test_signup_form_reports_every_field() {
    let plan = Plan::new(signup_schema()).unwrap();
    let input = Value::from(json!({
        "email": "nobody",
        "age": [1],
        "nick": "!!",
        "born": "yesterday",
    }));

    let errors = plan.validate(&input).unwrap_err();
    assert_eq!(errors.len(), 4);
    let paths: Vec<String> = errors.iter().map(|(_, e)| e.path().to_string()).collect();
    assert_eq!(paths, vec!["$.email", "$.age", "$.nick", "$.born"]);
}

#[test]
fn test_loose_casts_in_sequence() {
    let plan = Plan::new(seq([cast::intval(10).unwrap()]).unwrap()).unwrap();
    let output = plan
        .validate(&Value::from(json!(["1", "2 apples", 3.7, null, true])))
        .unwrap();
    assert_eq!(output, Value::list([1, 2, 3, 0, 1]));
}

#[test]
fn test_any_between_date_formats() {
    let plan = Plan::new(
        any([
            datetime::parse("%Y-%m-%d", false).unwrap(),
            datetime::parse("%d/%m/%Y", false).unwrap(),
        ])
        .unwrap(),
    )
    .unwrap();

    let a = plan.validate(&Value::from("2024-03-01")).unwrap();
    let b = plan.validate(&Value::from("01/03/2024")).unwrap();
    assert_eq!(
        a.as_instance().and_then(|i| i.downcast_ref::<datetime::Parsed>()),
        b.as_instance().and_then(|i| i.downcast_ref::<datetime::Parsed>())
    );
    assert!(!plan.is_valid(&Value::from("March 1st")));
}

#[test]
fn test_upload_descriptor_in_form() {
    let plan = Plan::new(
        dict([("avatar", upload::file().unwrap())], Required::All, Extra::Deny).unwrap(),
    )
    .unwrap();
    let input = Value::from(json!({
        "avatar": {
            "tmp_name": "/tmp/x",
            "size": 10,
            "error": 3,
            "name": "me.png",
            "type": "image/png",
        }
    }));

    let errors = plan.validate(&input).unwrap_err();
    assert_eq!(
        errors.messages(),
        vec!["Invalid value at key avatar (value is {\"tmp_name\": \"/tmp/x\", \"size\": 10, \"error\": 3, ...}): File \"me.png\" was only partially uploaded"]
    );
}

proptest! {
    /// Alphanumeric filtering is idempotent.
    #[test]
    fn alnum_is_idempotent(text in "\\PC{0,40}") {
        let filter = intl::alnum(true).unwrap();
        let once = filter.call(&Value::from(text.as_str())).unwrap();
        let twice = filter.call(&once).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Loose integer casts never fail.
    #[test]
    fn intval_never_fails(text in "\\PC{0,20}") {
        let filter = cast::intval(10).unwrap();
        prop_assert!(filter.call(&Value::from(text.as_str())).is_ok());
    }
}
