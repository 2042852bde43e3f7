//! Credentials supplied by the embedding application.

/// Source of the bearer token and display name used when joining rooms.
///
/// Read on every connect attempt, so a provider may rotate tokens between reconnects.
pub trait AuthProvider: Send + Sync {
    fn token(&self) -> Option<String>;
    fn display_name(&self) -> String;
}

/// Fixed credentials.
#[derive(Debug, Clone)]
pub struct StaticAuth {
    token: Option<String>,
    name: String,
}

impl StaticAuth {
    pub fn new(token: Option<String>, name: impl Into<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
            name: name.into(),
        }
    }

    /// Bearer token + display name.
    pub fn bearer(token: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(Some(token.into()), name)
    }
}

impl AuthProvider for StaticAuth {
    fn token(&self) -> Option<String> {
        self.token.clone()
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}
