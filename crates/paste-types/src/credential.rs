use std::fmt;

/// Short random secret returned to the client exactly once, at creation.
///
/// The plaintext never reaches a store; only its [`SecretHash`] does.
/// `Debug` is redacted so a credential cannot leak through log fields.
///
/// [`SecretHash`]: crate::SecretHash
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Length of a freshly issued credential.
    pub const LEN: usize = 8;

    /// Wrap a credential presented by a client. No validation is applied:
    /// a malformed credential simply fails verification.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl From<String> for Credential {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Credential {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
