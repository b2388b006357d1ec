use secrecy::{ExposeSecret, Secret};

// ── Types ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// No shared secret configured: every control request is accepted.
    Open,
    /// Requests must carry the configured shared secret.
    SharedSecret,
}

/// Resolved control-surface auth configuration.
#[derive(Clone)]
pub struct ControlAuth {
    key: Option<Secret<String>>,
}

impl std::fmt::Debug for ControlAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlAuth")
            .field("mode", &self.mode())
            .finish()
    }
}

/// Result of an authorization attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthResult {
    pub ok: bool,
    pub reason: Option<&'static str>,
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Constant-time string comparison (prevents timing attacks).
fn safe_equal(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let diff = a
        .as_bytes()
        .iter()
        .zip(b.as_bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y));
    diff == 0
}

// ── Auth logic ───────────────────────────────────────────────────────────────

impl ControlAuth {
    /// Resolve from the configured key. Unset or empty selects
    /// [`AuthMode::Open`].
    pub fn resolve(key: Option<&str>) -> Self {
        let key = key
            .filter(|k| !k.is_empty())
            .map(|k| Secret::new(k.to_string()));
        Self { key }
    }

    pub fn mode(&self) -> AuthMode {
        if self.key.is_some() {
            AuthMode::SharedSecret
        } else {
            AuthMode::Open
        }
    }

    /// Check a credential supplied with a control request.
    pub fn authorize(&self, provided: Option<&str>) -> AuthResult {
        let Some(expected) = self.key.as_ref() else {
            return AuthResult {
                ok: true,
                reason: Some("open_mode"),
            };
        };
        let Some(given) = provided else {
            return AuthResult {
                ok: false,
                reason: Some("key_missing"),
            };
        };
        if !safe_equal(given, expected.expose_secret()) {
            return AuthResult {
                ok: false,
                reason: Some("key_mismatch"),
            };
        }
        AuthResult {
            ok: true,
            reason: None,
        }
    }
}
