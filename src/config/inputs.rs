//! Input sources.
//!
//! Inputs are looked up by their action name (`github-token`,
//! `expiration-hours`, ...). Every source returns raw values; blank values
//! are treated as absent by [`lookup`], which is how the Actions runner
//! represents unset inputs.

use std::collections::HashMap;

/// A place action inputs can be read from.
pub trait InputSource: Send + Sync {
    /// Returns the raw value of `name`, if the source has one.
    fn get(&self, name: &str) -> Option<String>;
}

/// Reads `name` from `source`, trimmed, treating blank values as absent.
pub fn lookup(source: &dyn InputSource, name: &str) -> Option<String> {
    source
        .get(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// GitHub Actions inputs exported by the runner as `INPUT_<NAME>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvInputs;

impl EnvInputs {
    /// Environment variable the runner uses for an input.
    ///
    /// Upper-cases the name and replaces spaces with `_`; hyphens are kept.
    #[must_use]
    pub fn env_key(name: &str) -> String {
        format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
    }
}

impl InputSource for EnvInputs {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(Self::env_key(name)).ok()
    }
}

/// In-memory inputs, used for command-line flags and in tests.
#[derive(Debug, Clone, Default)]
pub struct MapInputs {
    values: HashMap<String, String>,
}

impl MapInputs {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an input.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets an input in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Sets an input when `value` is present.
    pub fn insert_opt(&mut self, name: impl Into<String>, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            self.insert(name, value);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapInputs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl InputSource for MapInputs {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

/// Several sources consulted in priority order.
///
/// The first layer with a non-blank value wins, so an empty `INPUT_*`
/// variable does not hide a value from a lower layer.
#[derive(Default)]
pub struct LayeredInputs {
    layers: Vec<Box<dyn InputSource>>,
}

impl LayeredInputs {
    /// Creates a source with no layers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a layer with lower priority than every existing layer.
    #[must_use]
    pub fn then(mut self, layer: impl InputSource + 'static) -> Self {
        self.layers.push(Box::new(layer));
        self
    }

    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns true when no layers were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl std::fmt::Debug for LayeredInputs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredInputs")
            .field("layers", &self.layers.len())
            .finish()
    }
}

impl InputSource for LayeredInputs {
    fn get(&self, name: &str) -> Option<String> {
        self.layers
            .iter()
            .find_map(|layer| lookup(layer.as_ref(), name))
    }
}
