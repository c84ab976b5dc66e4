// ABOUTME: Permission tables - nested maps from view selectors to action
// ABOUTME: selectors to grants, resolved at check time with wildcard rules.

use std::collections::HashMap;
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::context::{Action, View};
use crate::error::ConfigError;
use crate::permission::grant::Grant;

/// Selects the views an entry applies to: one named view, or all of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewSelector {
    Any,
    Name(String),
}

impl ViewSelector {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            ViewSelector::Any => "*",
            ViewSelector::Name(name) => name,
        }
    }
}

impl fmt::Display for ViewSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ViewSelector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ViewSelector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SelectorVisitor;

        impl Visitor<'_> for SelectorVisitor {
            type Value = ViewSelector;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("\"*\" or a view name")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(match value {
                    "*" => ViewSelector::Any,
                    name => ViewSelector::Name(name.to_string()),
                })
            }
        }

        deserializer.deserialize_str(SelectorVisitor)
    }
}

/// Selects the actions an entry applies to: one action, or all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionSelector {
    Any,
    Action(Action),
}

impl ActionSelector {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionSelector::Any => "*",
            ActionSelector::Action(action) => action.as_str(),
        }
    }
}

impl fmt::Display for ActionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Action> for ActionSelector {
    fn from(action: Action) -> Self {
        Self::Action(action)
    }
}

impl Serialize for ActionSelector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActionSelector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SelectorVisitor;

        impl Visitor<'_> for SelectorVisitor {
            type Value = ActionSelector;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("\"*\" or an action name")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                const ACTIONS: [Action; 6] = [
                    Action::List,
                    Action::Retrieve,
                    Action::Create,
                    Action::Update,
                    Action::PartialUpdate,
                    Action::Destroy,
                ];

                if value == "*" {
                    return Ok(ActionSelector::Any);
                }
                ACTIONS
                    .into_iter()
                    .find(|action| action.as_str() == value)
                    .map(ActionSelector::Action)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Str(value), &self))
            }
        }

        deserializer.deserialize_str(SelectorVisitor)
    }
}

/// The per-view half of a table: action selector to grant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionTable(HashMap<ActionSelector, Grant>);

impl ActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, selector: impl Into<ActionSelector>, grant: Grant) {
        self.0.insert(selector.into(), grant);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolves the grant for an action.
    ///
    /// The wildcard rule is checked before any lookup: a table that holds
    /// the all-actions selector next to specific ones is misconfigured even
    /// when an exact entry for `action` exists. `view` only labels the
    /// resulting error.
    pub fn resolve(&self, action: Action, view: &str) -> Result<Option<&Grant>, ConfigError> {
        if self.0.contains_key(&ActionSelector::Any) && self.0.len() > 1 {
            return Err(ConfigError::MixedActionWildcard {
                view: view.to_string(),
            });
        }
        if let Some(grant) = self.0.get(&ActionSelector::Action(action)) {
            return Ok(Some(grant));
        }
        Ok(self.0.get(&ActionSelector::Any))
    }
}

/// A role's full permission table.
///
/// Built with the consuming `grant*` methods or deserialized from JSON,
/// where selectors appear as plain strings and `"*"` means "any":
///
/// ```json
/// {
///   "cats": {
///     "retrieve": {"fields": ["age", "color"]},
///     "list": {"fields": "*"}
///   }
/// }
/// ```
///
/// Construction never validates; wildcard ambiguity surfaces as a
/// [`ConfigError`] from [`PermissionTable::resolve`] at check time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionTable(HashMap<ViewSelector, ActionTable>);

impl PermissionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry under explicit selectors.
    pub fn entry(
        mut self,
        view: ViewSelector,
        action: impl Into<ActionSelector>,
        grant: Grant,
    ) -> Self {
        self.0.entry(view).or_default().insert(action, grant);
        self
    }

    /// Grants `action` on the named view.
    pub fn grant(self, view: impl Into<String>, action: Action, grant: Grant) -> Self {
        self.entry(ViewSelector::name(view), action, grant)
    }

    /// Grants every action on the named view.
    pub fn grant_any_action(self, view: impl Into<String>, grant: Grant) -> Self {
        self.entry(ViewSelector::name(view), ActionSelector::Any, grant)
    }

    /// Grants `action` on every view.
    pub fn grant_all_views(self, action: Action, grant: Grant) -> Self {
        self.entry(ViewSelector::Any, action, grant)
    }

    /// Grants every action on every view.
    pub fn grant_everything(self, grant: Grant) -> Self {
        self.entry(ViewSelector::Any, ActionSelector::Any, grant)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolves the grant covering `(view, action)`, if any.
    ///
    /// `Ok(None)` is an ordinary denial. Errors are reserved for tables
    /// that mix a wildcard selector with specific entries at the same
    /// level, which makes the intended precedence unknowable.
    pub fn resolve(&self, view: &View, action: Action) -> Result<Option<&Grant>, ConfigError> {
        if self.0.contains_key(&ViewSelector::Any) && self.0.len() > 1 {
            return Err(ConfigError::MixedViewWildcard);
        }

        let actions = self
            .0
            .get(&ViewSelector::Name(view.name.clone()))
            .or_else(|| self.0.get(&ViewSelector::Any));
        match actions {
            Some(actions) => actions.resolve(action, &view.name),
            None => Ok(None),
        }
    }
}
