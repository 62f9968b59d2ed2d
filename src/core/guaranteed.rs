use serde_json::Value;

/// 非陣列或缺值時回傳空 Vec
pub fn guaranteed_array(input: Option<&Value>) -> Vec<Value> {
    match input {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

pub fn guaranteed_string(input: Option<&Value>) -> String {
    input
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

/// 查詢用的 key：去頭尾空白、連續空白合併為一個空格、轉小寫
pub fn guaranteed_index_str(input: Option<&str>) -> String {
    let Some(text) = input else {
        return String::new();
    };

    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
