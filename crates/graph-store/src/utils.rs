//! 변환 헬퍼 — JSON 메타데이터 값을 bolt 파라미터로
//!
//! 컴포넌트 메타데이터는 `serde_json::Value`로 도착하고, 노드 속성은
//! bolt 타입이어야 합니다. 중첩 객체는 그래프 속성이 될 수 없으므로
//! JSON 문자열로 직렬화해 싣습니다.

use neo4rs::{BoltBoolean, BoltFloat, BoltInteger, BoltList, BoltNull, BoltString, BoltType};
use serde_json::Value;

/// JSON 값을 bolt 파라미터 값으로 변환합니다.
pub fn bolt_value(value: &Value) -> BoltType {
    match value {
        Value::Null => BoltType::Null(BoltNull),
        Value::Bool(b) => BoltType::Boolean(BoltBoolean::new(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                BoltType::Integer(BoltInteger::new(i))
            } else {
                BoltType::Float(BoltFloat::new(n.as_f64().unwrap_or(0.0)))
            }
        }
        Value::String(s) => BoltType::String(BoltString::from(s.as_str())),
        Value::Array(items) => {
            let list: Vec<BoltType> = items.iter().map(bolt_value).collect();
            BoltType::List(BoltList::from(list))
        }
        // 중첩 객체는 속성이 될 수 없으므로 JSON 문자열로 싣는다.
        Value::Object(_) => BoltType::String(BoltString::from(value.to_string().as_str())),
    }
}

/// 메타데이터에서 키를 찾아 bolt 값으로 변환합니다. 없으면 null.
pub fn metadata_param(metadata: &serde_json::Map<String, Value>, key: &str) -> BoltType {
    metadata
        .get(key)
        .map(bolt_value)
        .unwrap_or(BoltType::Null(BoltNull))
}

/// 메타데이터에서 문자열 값을 찾습니다. 없거나 문자열이 아니면 빈 문자열.
pub fn metadata_str(metadata: &serde_json::Map<String, Value>, key: &str) -> String {
    metadata
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}
