use std::time::Duration;

use serde::Deserialize;

/// Cross-origin settings for browser clients of the gateway
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins (`"*"` or a list)
    #[serde(default)]
    pub origins: AnyOrList,
    /// Allowed methods (`"*"` or a list)
    #[serde(default)]
    pub methods: AnyOrList,
    /// Allowed request headers (`"*"` or a list)
    #[serde(default)]
    pub headers: AnyOrList,
    /// Response headers readable by the browser, e.g. `X-Request-ID`
    #[serde(default)]
    pub expose_headers: Vec<String>,
    /// Preflight cache lifetime in seconds
    #[serde(default)]
    pub max_age: Option<u64>,
}

impl CorsConfig {
    pub fn max_age_duration(&self) -> Option<Duration> {
        self.max_age.map(Duration::from_secs)
    }
}

/// Either the `"*"` wildcard or an explicit list of values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnyOrList {
    #[default]
    Any,
    List(Vec<String>),
}

impl<'de> Deserialize<'de> for AnyOrList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            One(String),
            Many(Vec<String>),
        }

        let values = match Raw::deserialize(deserializer)? {
            Raw::One(value) => vec![value],
            Raw::Many(values) => values,
        };

        if values.iter().any(|v| v == "*") {
            Ok(Self::Any)
        } else {
            Ok(Self::List(values))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        origins: AnyOrList,
    }

    #[test]
    fn wildcard_string_is_any() {
        let parsed: Wrapper = toml::from_str(r#"origins = "*""#).unwrap();
        assert_eq!(parsed.origins, AnyOrList::Any);
    }

    #[test]
    fn wildcard_inside_list_is_any() {
        let parsed: Wrapper = toml::from_str(r#"origins = ["https://a.example", "*"]"#).unwrap();
        assert_eq!(parsed.origins, AnyOrList::Any);
    }

    #[test]
    fn single_origin_becomes_list() {
        let parsed: Wrapper = toml::from_str(r#"origins = "https://a.example""#).unwrap();
        assert_eq!(parsed.origins, AnyOrList::List(vec!["https://a.example".to_string()]));
    }
}
