// Client record

use serde::{Deserialize, Serialize};

/// A stored client
///
/// `id` is owned by the store: whatever arrives in a request body is
/// overwritten on `create`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    #[serde(default)]
    pub id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Client {
    /// Client with only a name set, as a request body usually carries
    #[cfg(test)]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Copy of this record under a store-assigned identifier
    #[must_use]
    pub fn with_id(self, id: i32) -> Self {
        Self { id, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_are_omitted() {
        let client = Client::named("A").with_id(1);
        let json = serde_json::to_string(&client).unwrap();
        assert_eq!(json, r#"{"id":1,"name":"A"}"#);
    }

    #[test]
    fn test_body_without_id_defaults_to_zero() {
        let client: Client = serde_json::from_str(r#"{"name":"A","phone":"+7 900"}"#).unwrap();
        assert_eq!(client.id, 0);
        assert_eq!(client.name.as_deref(), Some("A"));
        assert_eq!(client.phone.as_deref(), Some("+7 900"));
        assert!(client.email.is_none());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let client: Client = serde_json::from_str(r#"{"name":"B","nickname":"bee"}"#).unwrap();
        assert_eq!(client, Client::named("B"));
    }

    #[test]
    fn test_wrong_field_type_is_rejected() {
        assert!(serde_json::from_str::<Client>(r#"{"name":5}"#).is_err());
    }
}
