#![allow(dead_code)]

use serde_json::{Value, json};
use tabula_engine::model::{Field, FieldType, Record};

pub fn scenario_fields() -> Vec<Field> {
    vec![
        Field::new("age", FieldType::Number),
        Field::new("isChecked", FieldType::Checkbox),
    ]
}

/// Ages 25, 30, 35 with checked, unchecked, checked
pub fn scenario_records() -> Vec<Record> {
    [(25, true), (30, false), (35, true)]
        .into_iter()
        .enumerate()
        .map(|(i, (age, checked))| {
            Record::new(format!("rec{}", age), i as i64)
                .with_field("age", json!(age))
                .with_field("isChecked", json!(checked))
        })
        .collect()
}

pub fn mixed_fields() -> Vec<Field> {
    vec![
        Field::new("name", FieldType::Text),
        Field::new("age", FieldType::Number),
        Field::new("due", FieldType::Date),
        Field::new("done", FieldType::Checkbox),
        Field::new("status", FieldType::SingleSelect),
        Field::new("tags", FieldType::MultiSelect),
        Field::new("score", FieldType::Rollup),
        Field::new("owner", FieldType::Link),
    ]
}

/// Records covering missing, empty, mixed-case and badly-typed values
pub fn mixed_records() -> Vec<Record> {
    let rows: Vec<(&str, Value)> = vec![
        (
            "r0",
            json!({"name": "Alice", "age": 34, "due": "2024-03-01", "done": true,
                   "status": "open", "tags": ["red", "blue"], "score": 7.5, "owner": ["u1"]}),
        ),
        (
            "r1",
            json!({"name": "bob", "age": "19", "due": "2023-12-31", "done": "TRUE",
                   "status": "closed", "tags": ["blue"], "score": "3"}),
        ),
        (
            "r2",
            json!({"name": "", "age": "n/a", "due": "", "done": false,
                   "status": "", "tags": [], "score": null}),
        ),
        ("r3", json!({})),
        (
            "r4",
            json!({"name": "Carol Ann", "age": 52, "due": "2024-06-15", "done": "false",
                   "status": "open", "tags": ["green", "red", "blue"], "score": 12, "owner": []}),
        ),
        (
            "r5",
            json!({"name": "ALICE", "age": 34.5, "due": "2024-03-01", "tags": ["Red"],
                   "status": "Open", "score": -1}),
        ),
        (
            "r6",
            json!({"name": "dave_100%", "age": "", "due": "2025-01-01", "done": true,
                   "status": null, "tags": ["green"], "score": 0}),
        ),
        (
            "r7",
            json!({"name": null, "age": 0, "due": "2024-03-02", "done": null,
                   "tags": null, "owner": ["u2", "u3"]}),
        ),
    ];

    rows.into_iter()
        .enumerate()
        .map(|(i, (id, fields))| {
            let mut record = Record::new(id, i as i64);
            if let Value::Object(map) = fields {
                record.fields = map;
            }
            record
        })
        .collect()
}

pub fn ids(records: &[&Record]) -> Vec<String> {
    records.iter().map(|r| r.id.clone()).collect()
}

/// Placeholders outside single-quoted literals, in order of appearance
pub fn placeholders(sql: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut in_literal = false;
    let chars: Vec<char> = sql.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '\'' {
            in_literal = !in_literal;
        } else if !in_literal && c == '?' {
            found.push("?".to_string());
        } else if !in_literal && c == '$' {
            let digits: String = chars[i + 1..].iter().take_while(|c| c.is_ascii_digit()).collect();
            if !digits.is_empty() {
                i += digits.len();
                found.push(format!("${}", digits));
            }
        }
        i += 1;
    }
    found
}
