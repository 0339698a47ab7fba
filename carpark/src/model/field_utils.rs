use serde::{de, Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Deserializes an optional text field that older data may hold as a number.
pub(crate) fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected text or number, found {}",
            other
        ))),
    }
}

/// Deserializes a value that may be `null`, falling back to its default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Assigns `value` to `target` when present.
#[inline]
pub(crate) fn merge_field<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// Assigns `value` to an optional `target` when present.
#[inline]
pub(crate) fn merge_optional<T>(target: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *target = value;
    }
}

/// Copies every supplied caller field over the stored ones.
#[inline]
pub(crate) fn merge_extra(target: &mut Map<String, Value>, extra: Map<String, Value>) {
    for (key, value) in extra {
        target.insert(key, value);
    }
}

/// Removes the keys the registry assigns itself from caller input. Left in
/// `extra` they would be serialized a second time next to the real field.
pub(crate) fn without_reserved(mut extra: Map<String, Value>, reserved: &[&str]) -> Map<String, Value> {
    for key in reserved {
        if extra.remove(*key).is_some() {
            log::debug!("Ignoring caller value for generated field {}", key);
        }
    }
    extra
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Room {
        #[serde(default, deserialize_with = "optional_text")]
        room: Option<String>,
    }

    #[test]
    fn test_optional_text_accepts_string_number_and_null() {
        let text: Room = serde_json::from_value(json!({"room": "12"})).unwrap();
        assert_eq!(text.room.as_deref(), Some("12"));

        let number: Room = serde_json::from_value(json!({"room": 12})).unwrap();
        assert_eq!(number.room.as_deref(), Some("12"));

        let null: Room = serde_json::from_value(json!({"room": null})).unwrap();
        assert_eq!(null.room, None);

        let missing: Room = serde_json::from_value(json!({})).unwrap();
        assert_eq!(missing.room, None);
    }

    #[derive(Deserialize)]
    struct Tags {
        #[serde(default, deserialize_with = "null_as_default")]
        tags: Vec<String>,
    }

    #[test]
    fn test_null_as_default() {
        let null: Tags = serde_json::from_value(json!({"tags": null})).unwrap();
        assert!(null.tags.is_empty());
        let missing: Tags = serde_json::from_value(json!({})).unwrap();
        assert!(missing.tags.is_empty());
        let some: Tags = serde_json::from_value(json!({"tags": ["a"]})).unwrap();
        assert_eq!(some.tags, vec!["a"]);
    }

    #[test]
    fn test_optional_text_rejects_objects() {
        let result = serde_json::from_value::<Room>(json!({"room": {"floor": 1}}));
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_helpers() {
        let mut name = "Jane".to_string();
        merge_field(&mut name, None);
        assert_eq!(name, "Jane");
        merge_field(&mut name, Some("John".to_string()));
        assert_eq!(name, "John");

        let mut spot = Some("A1".to_string());
        merge_optional(&mut spot, None);
        assert_eq!(spot.as_deref(), Some("A1"));
        merge_optional(&mut spot, Some("B2".to_string()));
        assert_eq!(spot.as_deref(), Some("B2"));

        let mut extra = Map::new();
        extra.insert("loyalty".to_string(), json!("gold"));
        let mut update = Map::new();
        update.insert("loyalty".to_string(), json!("platinum"));
        update.insert("valet".to_string(), json!(true));
        merge_extra(&mut extra, update);
        assert_eq!(extra.get("loyalty"), Some(&json!("platinum")));
        assert_eq!(extra.get("valet"), Some(&json!(true)));
    }

    #[test]
    fn test_without_reserved() {
        let mut extra = Map::new();
        extra.insert("id".to_string(), json!("other"));
        extra.insert("registeredAt".to_string(), json!("yesterday"));
        extra.insert("valet".to_string(), json!(true));

        let kept = without_reserved(extra, &["id", "registeredAt", "status"]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept.get("valet"), Some(&json!(true)));
    }
}
