use std::sync::OnceLock;

use regex::Regex;

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*(?P<key>[A-Za-z0-9_.]+)\s*(?:\|\s*default\("(?P<default>[^"]*)"\)\s*)?\}\}"#)
            .expect("must be valid regex")
    })
}

/// Substitute `{{ env.NAME }}` placeholders with values from the process environment
///
/// `{{ env.NAME | default("value") }}` falls back to `value` when `NAME` is unset.
/// Comment lines are copied verbatim so a commented-out setting never
/// requires its variable to exist.
pub fn expand_env(input: &str) -> Result<String, String> {
    let mut expanded = String::with_capacity(input.len());

    for line in input.split_inclusive('\n') {
        if line.trim_start().starts_with('#') {
            expanded.push_str(line);
            continue;
        }

        let mut cursor = 0;
        for captures in placeholder().captures_iter(line) {
            let (Some(whole), Some(key)) = (captures.get(0), captures.name("key")) else {
                continue;
            };

            expanded.push_str(&line[cursor..whole.start()]);
            expanded.push_str(&resolve(key.as_str(), captures.name("default").map(|m| m.as_str()))?);
            cursor = whole.end();
        }
        expanded.push_str(&line[cursor..]);
    }

    Ok(expanded)
}

fn resolve(key: &str, default: Option<&str>) -> Result<String, String> {
    let Some(name) = key.strip_prefix("env.").filter(|name| !name.is_empty() && !name.contains('.')) else {
        return Err(format!("only variables scoped with 'env.' are supported: `{key}`"));
    };

    match (std::env::var(name), default) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(fallback)) => Ok(fallback.to_string()),
        (Err(_), None) => Err(format!("environment variable not found: `{name}`")),
    }
}
