//! Declarative mappings from exported entities to search documents.
//!
//! Each field declares its index type and, optionally, the export field it is
//! copied from. Values are coerced to the declared type on the way in.

use minds_db::entities::{entity, entity::EntityType, user};
use serde_json::{Map, Value, json};

/// Index field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Integer,
    Boolean,
    Date,
}

impl FieldType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Date => "date",
        }
    }

    fn coerce(self, value: &Value) -> Option<Value> {
        match (self, value) {
            (_, Value::Null) => None,
            (_, Value::Array(items)) => Some(Value::Array(
                items.iter().filter_map(|v| self.coerce(v)).collect(),
            )),
            (Self::Text, Value::String(_)) | (Self::Date, _) => Some(value.clone()),
            (Self::Text, other) => Some(Value::String(other.to_string())),
            (Self::Integer, Value::Number(n)) => n.as_i64().map(Value::from),
            (Self::Integer, Value::String(s)) => s.parse::<i64>().ok().map(Value::from),
            (Self::Integer, Value::Bool(b)) => Some(Value::from(i64::from(*b))),
            (Self::Boolean, Value::Bool(b)) => Some(Value::Bool(*b)),
            (Self::Boolean, Value::Number(n)) => Some(Value::Bool(n.as_i64() != Some(0))),
            (Self::Boolean, Value::String(s)) => Some(Value::Bool(matches!(s.as_str(), "1" | "true"))),
            _ => None,
        }
    }
}

/// One field of a mapping.
#[derive(Debug, Clone, Copy)]
pub struct FieldMapping {
    pub field_type: FieldType,
    pub export_field: Option<&'static str>,
}

/// An ordered set of field mappings.
#[derive(Debug, Clone)]
pub struct Mapping {
    fields: Vec<(&'static str, FieldMapping)>,
}

impl Mapping {
    fn field(mut self, name: &'static str, field_type: FieldType, export_field: Option<&'static str>) -> Self {
        self.fields.retain(|(n, _)| *n != name);
        self.fields.push((
            name,
            FieldMapping {
                field_type,
                export_field,
            },
        ));
        self
    }

    /// Fields shared by every indexed entity.
    #[must_use]
    pub fn entity() -> Self {
        Self { fields: Vec::new() }
            .field("@timestamp", FieldType::Date, None)
            .field("guid", FieldType::Text, Some("guid"))
            .field("type", FieldType::Text, Some("type"))
            .field("subtype", FieldType::Text, Some("subtype"))
            .field("time_created", FieldType::Integer, Some("time_created"))
            .field("access_id", FieldType::Text, Some("access_id"))
            .field("owner_guid", FieldType::Text, Some("owner_guid"))
            .field("message", FieldType::Text, Some("message"))
            .field("title", FieldType::Text, Some("title"))
            .field("mature", FieldType::Boolean, None)
            .field("nsfw", FieldType::Integer, Some("nsfw"))
            .field("tags", FieldType::Text, None)
            .field("votes:up", FieldType::Integer, Some("votes_up"))
            .field("votes:down", FieldType::Integer, Some("votes_down"))
    }

    /// Activity posts.
    #[must_use]
    pub fn activity() -> Self {
        Self::entity()
            .field("rating", FieldType::Integer, Some("rating"))
            .field("custom_type", FieldType::Text, Some("custom_type"))
            .field("entity_guid", FieldType::Text, Some("entity_guid"))
            .field("pending", FieldType::Boolean, Some("pending"))
            .field("license", FieldType::Text, Some("license"))
    }

    /// Channels.
    #[must_use]
    pub fn user() -> Self {
        Self::entity()
            .field("username", FieldType::Text, Some("username"))
            .field("name", FieldType::Text, Some("name"))
            .field("email_confirmed", FieldType::Boolean, Some("email_confirmed"))
    }

    /// Select the mapping for an entity type.
    #[must_use]
    pub fn for_type(entity_type: EntityType) -> Self {
        match entity_type {
            EntityType::Activity => Self::activity(),
            EntityType::User => Self::user(),
            EntityType::Object | EntityType::Group | EntityType::Comment => Self::entity(),
        }
    }

    /// Index-side mapping definition (`properties`).
    #[must_use]
    pub fn properties(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, f)| ((*name).to_string(), json!({ "type": f.field_type.as_str() })))
            .collect();
        json!({ "properties": properties })
    }

    /// Build a search document from an export.
    #[must_use]
    pub fn map(&self, export: &Map<String, Value>) -> Map<String, Value> {
        let mut doc = Map::new();

        for (name, field) in &self.fields {
            let Some(source) = field.export_field else {
                continue;
            };
            if let Some(value) = export.get(source).and_then(|v| field.field_type.coerce(v)) {
                doc.insert((*name).to_string(), value);
            }
        }

        if let Some(created) = export.get("time_created").and_then(Value::as_i64) {
            doc.insert("@timestamp".to_string(), Value::from(created * 1000));
        }

        let mature = export
            .get("nsfw")
            .and_then(Value::as_array)
            .is_some_and(|reasons| !reasons.is_empty());
        doc.insert("mature".to_string(), Value::Bool(mature));

        if let Some(message) = export.get("message").and_then(Value::as_str) {
            let tags = extract_tags(message);
            if !tags.is_empty() {
                doc.insert("tags".to_string(), json!(tags));
            }
        }

        doc
    }
}

/// Hashtags in a message, lowercased and deduplicated.
#[must_use]
pub fn extract_tags(message: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for word in message.split_whitespace() {
        let Some(raw) = word.strip_prefix('#') else {
            continue;
        };
        let tag: String = raw
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect::<String>()
            .to_lowercase();
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// Public export of an entity. Guids are strings, times are unix seconds.
#[must_use]
pub fn export_entity(entity: &entity::Model) -> Map<String, Value> {
    let value = json!({
        "guid": entity.guid.to_string(),
        "type": entity.entity_type.as_str(),
        "subtype": entity.subtype,
        "owner_guid": entity.owner_guid.to_string(),
        "access_id": entity.access_id,
        "entity_guid": entity.entity_guid.map(|g| g.to_string()),
        "nsfw": entity.nsfw,
        "nsfw_lock": entity.nsfw_lock,
        "votes_up": entity.votes_up,
        "votes_down": entity.votes_down,
        "message": entity.message,
        "title": entity.title,
        "custom_type": entity.custom_type,
        "license": entity.license,
        "rating": entity.rating,
        "pending": entity.pending,
        "time_created": entity.time_created.timestamp(),
        "time_updated": entity.time_updated.map(|t| t.timestamp()),
    });

    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Public export of a user. Private fields are never included.
#[must_use]
pub fn export_user(user: &user::Model) -> Map<String, Value> {
    let value = json!({
        "guid": user.guid.to_string(),
        "type": "user",
        "username": user.username,
        "name": user.name.clone().unwrap_or_else(|| user.username.clone()),
        "access_id": "2",
        "owner_guid": user.guid.to_string(),
        "is_admin": user.is_admin,
        "banned": user.is_banned,
        "email_confirmed": user.is_email_confirmed(),
        "merchant": user.merchant,
        "time_created": user.created_at.timestamp(),
    });

    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{confirmed_user, entity};

    #[test]
    fn test_activity_extends_entity_fields() {
        let props = Mapping::activity().properties();

        assert_eq!(props["properties"]["rating"]["type"], "integer");
        assert_eq!(props["properties"]["pending"]["type"], "boolean");
        assert_eq!(props["properties"]["license"]["type"], "text");
        assert_eq!(props["properties"]["guid"]["type"], "text");
        assert!(Mapping::entity().properties()["properties"].get("rating").is_none());
    }

    #[test]
    fn test_map_coerces_types() {
        let mut activity = entity(10, 2, "2");
        activity.entity_guid = Some(99);
        activity.nsfw = json!([1]);

        let doc = Mapping::activity().map(&export_entity(&activity));

        assert_eq!(doc["guid"], json!("10"));
        assert_eq!(doc["entity_guid"], json!("99"));
        assert_eq!(doc["rating"], json!(1));
        assert_eq!(doc["pending"], json!(false));
        assert_eq!(doc["mature"], json!(true));
        assert_eq!(doc["tags"], json!(["minds"]));
        assert_eq!(doc["votes:up"], json!(0));
        assert!(doc.contains_key("@timestamp"));
        assert!(!doc.contains_key("license"));
    }

    #[test]
    fn test_user_mapping() {
        let doc = Mapping::user().map(&export_user(&confirmed_user(7)));

        assert_eq!(doc["username"], json!("user7"));
        assert_eq!(doc["email_confirmed"], json!(true));
        assert!(!doc.contains_key("email"));
    }

    #[test]
    fn test_boolean_coercion_from_strings() {
        assert_eq!(FieldType::Boolean.coerce(&json!("1")), Some(json!(true)));
        assert_eq!(FieldType::Integer.coerce(&json!("12")), Some(json!(12)));
        assert_eq!(FieldType::Integer.coerce(&json!("x")), None);
    }

    #[test]
    fn test_extract_tags() {
        assert_eq!(
            extract_tags("Hello #Minds and #rust, #minds again #"),
            vec!["minds".to_string(), "rust".to_string()]
        );
    }
}
