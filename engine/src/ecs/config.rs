//! Runtime limits for a [`Coordinator`](crate::ecs::Coordinator).
//!
//! Both limits are fixed at construction. `max_entities` bounds the pool of entity IDs and the
//! per-entity bookkeeping arrays; `max_component_kinds` is the width of every
//! [`Signature`](crate::ecs::Signature) and therefore the number of distinct component types that
//! can be registered.
//!
//! Limits can be embedded in an application's TOML settings:
//!
//! ```toml
//! max_entities = 10000
//! max_component_kinds = 64
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while loading a [`Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid TOML or has fields of the wrong type.
    #[error("failed to parse ECS config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be rendered as TOML.
    #[error("failed to serialize ECS config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A field holds a value the runtime cannot work with.
    #[error("invalid ECS config: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Limits injected into a [`Coordinator`](crate::ecs::Coordinator) at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of simultaneously live entities.
    pub max_entities: u32,
    /// Maximum number of distinct component types (signature width in bits).
    pub max_component_kinds: u32,
}

impl Config {
    pub const DEFAULT_MAX_ENTITIES: u32 = 5000;
    pub const DEFAULT_MAX_COMPONENT_KINDS: u32 = 32;

    /// Construct a config with explicit limits.
    #[inline]
    pub const fn new(max_entities: u32, max_component_kinds: u32) -> Self {
        Self {
            max_entities,
            max_component_kinds,
        }
    }

    /// Replace the entity limit.
    #[inline]
    pub const fn with_max_entities(mut self, max_entities: u32) -> Self {
        self.max_entities = max_entities;
        self
    }

    /// Replace the component kind limit.
    #[inline]
    pub const fn with_max_component_kinds(mut self, max_component_kinds: u32) -> Self {
        self.max_component_kinds = max_component_kinds;
        self
    }

    /// Parse a config from a TOML document. Missing fields fall back to their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Render this config as a TOML document.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject limits that would leave the runtime unable to hold any entity or component.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_entities == 0 {
            return Err(ConfigError::Invalid {
                field: "max_entities",
                reason: "must be at least 1",
            });
        }
        if self.max_component_kinds == 0 {
            return Err(ConfigError::Invalid {
                field: "max_component_kinds",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ENTITIES, Self::DEFAULT_MAX_COMPONENT_KINDS)
    }
}
