// ABOUTME: Request-side context types - the request, its authenticated
// ABOUTME: identity, the view being accessed, and the derived action label.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// HTTP method of an incoming request.
///
/// `Head` and `Options` are treated as reads when inferring an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Head,
    Options,
    Post,
    Put,
    Patch,
    Delete,
}

/// Whether a view addresses a whole collection or a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Collection,
    Item,
}

/// The logical action a request performs against a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    PartialUpdate,
    Destroy,
}

impl Action {
    /// Derive the action from an HTTP method and a view kind.
    ///
    /// The mapping is total: GET/HEAD/OPTIONS resolve to `List` on a
    /// collection and `Retrieve` on an item; POST is `Create`, PUT is
    /// `Update`, PATCH is `PartialUpdate`, DELETE is `Destroy` regardless
    /// of the view kind.
    pub fn infer(method: Method, kind: ViewKind) -> Self {
        match (method, kind) {
            (Method::Post, _) => Action::Create,
            (Method::Put, _) => Action::Update,
            (Method::Patch, _) => Action::PartialUpdate,
            (Method::Delete, _) => Action::Destroy,
            (_, ViewKind::Collection) => Action::List,
            (_, ViewKind::Item) => Action::Retrieve,
        }
    }

    /// The action's snake_case label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::List => "list",
            Action::Retrieve => "retrieve",
            Action::Create => "create",
            Action::Update => "update",
            Action::PartialUpdate => "partial_update",
            Action::Destroy => "destroy",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The endpoint a request is addressed to.
///
/// Views are identified by a stable name; permission tables key on that
/// name rather than on the host framework's handler types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub name: String,
    pub kind: ViewKind,
}

impl View {
    /// A collection view (e.g. `/cats`).
    pub fn collection(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ViewKind::Collection,
        }
    }

    /// An item view (e.g. `/cats/{id}`).
    pub fn item(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ViewKind::Item,
        }
    }
}

/// The authenticated identity attached to a request.
///
/// `properties` carries whatever the host's authentication layer resolved
/// (group names, staff flags, tenant ids); role activation predicates read
/// from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,

    #[serde(default)]
    pub properties: HashMap<String, serde_json::Value>,
}

impl Identity {
    /// Create an identity with no properties.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            properties: HashMap::new(),
        }
    }

    /// Attach a property to the identity.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.properties.insert(key.into(), v);
        }
        self
    }

    /// Look up a property by name.
    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key)
    }

    /// Whether a property is present and set to boolean `true`.
    pub fn flag(&self, key: &str) -> bool {
        self.property(key) == Some(&serde_json::Value::Bool(true))
    }
}

/// An incoming request as seen by the authorization layer.
///
/// The library reads only the method (for action inference) and whether an
/// identity is present; role implementations may read anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub method: Method,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
}

impl Request {
    /// Create an unauthenticated request.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            identity: None,
        }
    }

    /// Attach an authenticated identity.
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Whether an authenticated identity is attached.
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}
