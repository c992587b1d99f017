//! References to actions and guards inside a configuration.

use crate::core::{Action, Guard};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// An action named in a configuration: either a key into the setup's action
/// table or an inline action.
pub enum ActionRef<C> {
    Named(String),
    Inline(Action<C>),
}

impl<C> ActionRef<C> {
    /// The name recorded in action results.
    pub fn label(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Inline(action) => action.name(),
        }
    }
}

impl<C> From<&str> for ActionRef<C> {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl<C> From<String> for ActionRef<C> {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl<C> From<Action<C>> for ActionRef<C> {
    fn from(action: Action<C>) -> Self {
        Self::Inline(action)
    }
}

impl<C> fmt::Debug for ActionRef<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Inline(action) => f.debug_tuple("Inline").field(&action.name()).finish(),
        }
    }
}

// Only names can come from serialized configuration.
impl<'de, C> Deserialize<'de> for ActionRef<C> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::Named)
    }
}

/// A guard named in a configuration.
pub enum GuardRef<C> {
    Named(String),
    Inline(Guard<C>),
}

impl<C> GuardRef<C> {
    pub fn label(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Inline(guard) => guard.name(),
        }
    }
}

impl<C> From<&str> for GuardRef<C> {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl<C> From<String> for GuardRef<C> {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl<C> From<Guard<C>> for GuardRef<C> {
    fn from(guard: Guard<C>) -> Self {
        Self::Inline(guard)
    }
}

impl<C> fmt::Debug for GuardRef<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Inline(guard) => f.debug_tuple("Inline").field(&guard.name()).finish(),
        }
    }
}

impl<'de, C> Deserialize<'de> for GuardRef<C> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::Named)
    }
}
