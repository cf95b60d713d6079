//! Viewer identity and bearer credential for the current view session.

use std::collections::HashMap;
use std::fmt;

/// An opaque bearer token supplied by the surrounding app's auth layer.
///
/// It is attached to remote calls as-is and never parsed or refreshed.
/// `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Who is looking at the directory, and what to authenticate with.
///
/// The surrounding app keeps these as string entries (`id`, `token`) in its
/// session storage:
///
/// ```json
/// { "id": "user-42", "token": "eyJ..." }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Session {
    viewer_id: Option<String>,
    credential: Option<Credential>,
}

impl Session {
    /// An anonymous session.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(viewer_id: impl Into<String>, credential: Credential) -> Self {
        Self {
            viewer_id: Some(viewer_id.into()),
            credential: Some(credential),
        }
    }

    /// Build a session from stored key/value entries. Empty values count as
    /// absent.
    pub fn from_map(variables: &HashMap<String, String>) -> Self {
        let non_empty = |key: &str| {
            variables
                .get(key)
                .filter(|v| !v.is_empty())
                .cloned()
        };
        Self {
            viewer_id: non_empty("id"),
            credential: non_empty("token").map(Credential::new),
        }
    }

    pub fn viewer_id(&self) -> Option<&str> {
        self.viewer_id.as_deref()
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }
}
