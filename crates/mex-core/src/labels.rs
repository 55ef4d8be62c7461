use mex_model::App;

use crate::errors::LabelError;

/// Label names the exporter sets itself; metadata keys may not map onto them.
pub const RESERVED_LABELS: [&str; 2] = ["app", "state"];

/// Ordered set of application metadata keys exposed as metric labels.
///
/// Built once at startup. The order of [`LabelConfig::names`] is the order in which
/// [`LabelConfig::extract`] yields values, so the two always line up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelConfig {
    keys: Vec<String>,
    names: Vec<String>,
}

impl LabelConfig {
    /// Parse a comma separated key list; blanks are skipped.
    pub fn parse(raw: &str) -> Result<Self, LabelError> {
        Self::new(raw.split(',').map(str::trim).filter(|k| !k.is_empty()))
    }

    pub fn new<I, S>(keys: I) -> Result<Self, LabelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = Self::default();
        for key in keys {
            let key = key.into();
            let name = sanitize(&key);

            if RESERVED_LABELS.contains(&name.as_str()) || name.starts_with("__") {
                return Err(LabelError::Reserved { key, name });
            }
            if let Some(pos) = config.names.iter().position(|n| *n == name) {
                return Err(LabelError::Duplicate {
                    first: config.keys[pos].clone(),
                    second: key,
                    name,
                });
            }

            config.keys.push(key);
            config.names.push(name);
        }
        Ok(config)
    }

    /// Metadata keys as configured.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Prometheus label names, one per key.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Metadata values for `app` in configured order; missing keys yield `""`.
    pub fn extract<'a>(&self, app: &'a App) -> Vec<&'a str> {
        self.keys
            .iter()
            .map(|key| app.label(key).unwrap_or_default())
            .collect()
    }
}

/// Map an arbitrary metadata key onto `[a-zA-Z_][a-zA-Z0-9_]*`.
fn sanitize(key: &str) -> String {
    let mut name: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}
