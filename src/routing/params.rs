//! Match results and extracted path parameters.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

/// Errors from typed parameter access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("path parameter `{0}` is not present")]
    Missing(String),

    #[error("path parameter `{name}` has unparsable value `{value}`")]
    Invalid { name: String, value: String },
}

/// Path parameters captured by a match, in template declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(Arc<str>, String)>,
}

impl Params {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: Arc<str>, value: String) {
        self.entries.push((name, value));
    }

    /// Look up a value by parameter name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| &**key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Look up a value by its position in the template.
    pub fn get_index(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|(_, value)| value.as_str())
    }

    /// Parse a parameter into `T`.
    pub fn get_as<T: FromStr>(&self, name: &str) -> Result<T, ParamError> {
        let value = self
            .get(name)
            .ok_or_else(|| ParamError::Missing(name.to_string()))?;
        value.parse().map_err(|_| ParamError::Invalid {
            name: name.to_string(),
            value: value.to_string(),
        })
    }

    /// Iterate `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (&**name, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Params {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        Ok(())
    }
}

/// Outcome of a successful lookup: the handler plus its parameters.
///
/// Borrows the handler from the tree snapshot it was found in; the
/// parameters are owned.
#[derive(Debug)]
pub struct RouteMatch<'t, H> {
    pub(crate) handler: &'t H,
    pub(crate) template: &'t str,
    pub(crate) params: Params,
}

impl<'t, H> RouteMatch<'t, H> {
    pub fn handler(&self) -> &'t H {
        self.handler
    }

    /// The registered template string that matched.
    pub fn template(&self) -> &'t str {
        self.template
    }

    pub fn params(&self) -> &Params {
        &self.params
    }
}
