/// Expand `${VAR}` and `${VAR:-default}` placeholders from the process
/// environment.
///
/// A set, non-empty variable wins; otherwise the default is used when one is
/// given. Placeholders that resolve to nothing are left as written.
pub fn substitute_env(input: &str) -> String {
    substitute_with(input, |name| std::env::var(name).ok())
}

/// Same as [`substitute_env`] with an explicit variable lookup.
pub fn substitute_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let inner = &rest[start + 2..];
        let Some(end) = inner.find('}') else {
            // Unterminated, keep the tail verbatim.
            out.push_str(&rest[start..]);
            return out;
        };

        match resolve(&inner[..end], &lookup) {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[start..start + end + 3]),
        }
        rest = &inner[end + 1..];
    }

    out.push_str(rest);
    out
}

/// Value for one placeholder body (`NAME` or `NAME:-default`).
fn resolve(body: &str, lookup: &impl Fn(&str) -> Option<String>) -> Option<String> {
    let (name, default) = match body.split_once(":-") {
        Some((name, default)) => (name, Some(default)),
        None => (body, None),
    };
    if name.is_empty() {
        return None;
    }

    match (lookup(name), default) {
        (Some(value), Some(_)) if !value.is_empty() => Some(value),
        (Some(value), None) => Some(value),
        (_, Some(default)) => Some(default.to_string()),
        (None, None) => None,
    }
}
