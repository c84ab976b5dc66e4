// ABOUTME: Grant records - the fields/restriction pair attached to one
// ABOUTME: resolved (view, action) permission entry.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The fields a grant exposes, in declaration order.
///
/// Serializes as `"*"` for the all-fields marker and as a plain list
/// otherwise, so tables stay readable when authored as JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSet {
    /// Every field of the serialized object.
    All,
    /// An explicit, ordered allowlist.
    Named(Vec<String>),
}

impl FieldSet {
    /// Whether the set allows the given field.
    pub fn allows(&self, field: &str) -> bool {
        match self {
            FieldSet::All => true,
            FieldSet::Named(names) => names.iter().any(|n| n == field),
        }
    }
}

impl Serialize for FieldSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            FieldSet::All => serializer.serialize_str("*"),
            FieldSet::Named(names) => names.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for FieldSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldSetVisitor;

        impl<'de> Visitor<'de> for FieldSetVisitor {
            type Value = FieldSet;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("\"*\" or a list of field names")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                if value == "*" {
                    Ok(FieldSet::All)
                } else {
                    Err(E::invalid_value(de::Unexpected::Str(value), &self))
                }
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut names = Vec::new();
                while let Some(name) = seq.next_element::<String>()? {
                    names.push(name);
                }
                Ok(FieldSet::Named(names))
            }
        }

        deserializer.deserialize_any(FieldSetVisitor)
    }
}

/// An opaque row-level filter expression.
///
/// The library carries it from the grant to the restriction enforcer
/// untouched; interpreting it (against a query layer or in-memory objects)
/// is the collaborator's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Restriction(serde_json::Value);

impl Restriction {
    /// Wrap a filter expression.
    pub fn new(expr: impl Into<serde_json::Value>) -> Self {
        Self(expr.into())
    }

    /// The raw expression.
    pub fn expr(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<serde_json::Value> for Restriction {
    fn from(expr: serde_json::Value) -> Self {
        Self(expr)
    }
}

/// The access granted by one (view, action) permission entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grant {
    pub fields: FieldSet,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restriction: Option<Restriction>,
}

impl Grant {
    /// Grant access to an explicit, ordered list of fields.
    pub fn fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: FieldSet::Named(names.into_iter().map(Into::into).collect()),
            restriction: None,
        }
    }

    /// Grant access to every field.
    pub fn all_fields() -> Self {
        Self {
            fields: FieldSet::All,
            restriction: None,
        }
    }

    /// Attach a row-level restriction to the grant.
    pub fn with_restriction(mut self, restriction: impl Into<Restriction>) -> Self {
        self.restriction = Some(restriction.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_set_allows() {
        let named = FieldSet::Named(vec!["age".into(), "color".into()]);
        assert!(named.allows("age"));
        assert!(!named.allows("grumpiness"));
        assert!(FieldSet::All.allows("grumpiness"));
    }

    #[test]
    fn test_field_set_serde_forms() {
        assert_eq!(serde_json::to_value(FieldSet::All).unwrap(), json!("*"));
        assert_eq!(
            serde_json::to_value(FieldSet::Named(vec!["age".into()])).unwrap(),
            json!(["age"])
        );

        let all: FieldSet = serde_json::from_value(json!("*")).unwrap();
        assert_eq!(all, FieldSet::All);
        let named: FieldSet = serde_json::from_value(json!(["age", "color"])).unwrap();
        assert_eq!(named, FieldSet::Named(vec!["age".into(), "color".into()]));
        assert!(serde_json::from_value::<FieldSet>(json!("everything")).is_err());
    }

    #[test]
    fn test_grant_builders() {
        let grant = Grant::fields(["age", "color"])
            .with_restriction(Restriction::new(json!({"owner": "user-42"})));

        assert_eq!(
            grant.fields,
            FieldSet::Named(vec!["age".into(), "color".into()])
        );
        assert_eq!(
            grant.restriction.as_ref().map(Restriction::expr),
            Some(&json!({"owner": "user-42"}))
        );

        let open = Grant::all_fields();
        assert_eq!(open.fields, FieldSet::All);
        assert!(open.restriction.is_none());
    }

    #[test]
    fn test_grant_json_shape() {
        let grant: Grant = serde_json::from_value(json!({
            "fields": ["age", "color"],
            "restriction": {"owner": "user-42"}
        }))
        .unwrap();
        assert!(grant.fields.allows("color"));
        assert!(grant.restriction.is_some());

        let unrestricted: Grant = serde_json::from_value(json!({"fields": "*"})).unwrap();
        assert_eq!(unrestricted.fields, FieldSet::All);
        assert!(unrestricted.restriction.is_none());
    }
}
