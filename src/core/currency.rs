use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// 找出 `input` 中提到的三字母幣別代碼（轉為大寫）。
/// 物件內只有名稱含 currency / ccy 的欄位會被採用，其餘欄位遞迴搜尋。
pub fn determine_currencies(input: &Value) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    visit_top_level(input, &mut found);
    found
}

fn visit_top_level(value: &Value, found: &mut BTreeSet<String>) {
    match value {
        Value::String(text) => insert_code(text, found),
        Value::Array(items) => items.iter().for_each(|item| visit_top_level(item, found)),
        Value::Object(map) => search_object(map, found),
        _ => {}
    }
}

fn search(value: &Value, found: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => search_object(map, found),
        Value::Array(items) => items.iter().for_each(|item| search(item, found)),
        _ => {}
    }
}

fn search_object(map: &Map<String, Value>, found: &mut BTreeSet<String>) {
    for (key, value) in map {
        if is_currency_key(key) {
            collect_currency_value(value, found);
        } else {
            search(value, found);
        }
    }
}

fn collect_currency_value(value: &Value, found: &mut BTreeSet<String>) {
    match value {
        Value::String(text) => insert_code(text, found),
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::String(text) => insert_code(text, found),
                    Value::Object(map) => collect_code_field(map, found),
                    _ => {}
                }
            }
        }
        Value::Object(map) => {
            if map.get("code").is_some_and(Value::is_string) {
                collect_code_field(map, found);
            } else {
                // {"USD": {...}, "EUR": {...}} 形式；只接受本身已是大寫代碼的 key
                map.keys()
                    .filter(|key| is_upper_code(key))
                    .for_each(|key| insert_code(key, found));
            }
        }
        _ => {}
    }
}

fn collect_code_field(map: &Map<String, Value>, found: &mut BTreeSet<String>) {
    if let Some(Value::String(code)) = map.get("code") {
        insert_code(code, found);
    }
}

fn is_currency_key(key: &str) -> bool {
    let normalized: String = key
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect();

    normalized.contains("currenc") || normalized == "ccy"
}

fn is_upper_code(key: &str) -> bool {
    key.len() == 3 && key.bytes().all(|b| b.is_ascii_uppercase())
}

fn insert_code(candidate: &str, found: &mut BTreeSet<String>) {
    if let Some(code) = normalize_code(candidate) {
        found.insert(code);
    }
}

fn normalize_code(candidate: &str) -> Option<String> {
    let trimmed = candidate.trim();
    if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(trimmed.to_ascii_uppercase())
    } else {
        None
    }
}
