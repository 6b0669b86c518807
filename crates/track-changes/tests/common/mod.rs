//! Shared document fixtures.

#![allow(dead_code)]

use std::collections::BTreeMap;

use track_changes::{TrackedDocument, Value};

pub fn obj<const N: usize>(entries: [(&str, Value); N]) -> Value {
    Value::Object(
        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect::<BTreeMap<_, _>>(),
    )
}

pub fn arr<const N: usize>(items: [Value; N]) -> Value {
    Value::Array(items.into())
}

pub fn s(text: &str) -> Value {
    Value::from(text)
}

/// A 12-byte object id.
pub fn oid(seed: u8) -> Value {
    Value::binary([seed; 12])
}

/// Embedded documents carry an `_id`.
pub fn has_id(value: &Value) -> bool {
    value
        .as_object_entries()
        .is_some_and(|entries| entries.contains_key("_id"))
}

pub fn nested() -> Value {
    obj([("_id", oid(2)), ("nested", s("Hello")), ("nested2", s("Hello2"))])
}

pub fn nested2() -> Value {
    obj([("_id", oid(3)), ("nested", s("2Hello")), ("nested2", s("2Hello2"))])
}

pub fn contact() -> Value {
    obj([
        ("_id", oid(4)),
        ("name", s("Test contact 1 name")),
        ("phones", arr([s("Test contact 1 phone 1"), s("Test contact 1 phone 2")])),
        ("emails", arr([s("Test contact 1 email 1"), s("Test contact 1 email 2")])),
    ])
}

pub fn address() -> Value {
    obj([
        ("_id", oid(5)),
        ("coordinates", obj([("lat", Value::from(40i64)), ("lng", Value::from(1i64))])),
        ("url", s("https://test.com")),
        ("country", s("Test country")),
        ("postal_code", s("Test postal code")),
        ("route", s("Test route")),
    ])
}

pub fn customer_task() -> Value {
    obj([
        ("_id", oid(6)),
        (
            "notification",
            obj([
                ("_id", oid(7)),
                ("notify_at", Value::date(1_600_000_000_000)),
                ("notify_to", arr([oid(10), oid(11), oid(12)])),
                ("done_by", oid(13)),
            ]),
        ),
        ("created_by", oid(14)),
        ("description", s("test")),
        ("numbertype", Value::from(3i64)),
        (
            "mixednode",
            obj([(
                "depth00",
                obj([
                    ("depth10", obj([("depth20", s("test"))])),
                    ("depth11", s("test")),
                ]),
            )]),
        ),
    ])
}

/// The customer as it was persisted.
pub fn customer() -> Value {
    obj([
        ("_id", oid(1)),
        ("__v", Value::from(0i64)),
        ("name", s("Test name")),
        ("surname", s("Test surname")),
        ("nested", nested()),
        ("nested2", nested2()),
        ("address", address()),
        ("contacts", arr([contact()])),
        ("tasks", arr([customer_task()])),
    ])
}

/// A standalone task as it was persisted.
pub fn task() -> Value {
    obj([
        ("_id", oid(20)),
        ("initial_true", Value::from(true)),
        (
            "mixednode",
            obj([
                ("test", s("test")),
                (
                    "array",
                    arr([
                        Value::from(1i64),
                        Value::from(2i64),
                        Value::from(3i64),
                        Value::from(4i64),
                    ]),
                ),
            ]),
        ),
    ])
}

pub fn load_customer() -> TrackedDocument {
    TrackedDocument::load(customer()).with_nested_documents(has_id)
}

pub fn load_task() -> TrackedDocument {
    TrackedDocument::load(task()).with_nested_documents(has_id)
}
