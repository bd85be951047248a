//! Credential value types for the three-legged flow.
//!
//! Plain key/secret pairs supplied by the caller; persistence is out of
//! scope. `Debug` output redacts every secret so credentials can appear
//! in logs safely.

use std::fmt;

/// The client application's identity, issued by the service provider.
#[derive(Clone, PartialEq, Eq)]
pub struct Consumer {
    key: String,
    secret: String,
}

impl Consumer {
    pub fn new<K, S>(key: K, secret: S) -> Self
    where
        K: Into<String>,
        S: Into<String>,
    {
        Consumer {
            key: key.into(),
            secret: secret.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Consumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Short-lived credentials obtained in stage 1 of the flow, exchanged
/// for access credentials after resource-owner authorization.
#[derive(Clone, PartialEq, Eq)]
pub struct Temporary {
    token: String,
    secret: String,
}

impl Temporary {
    pub fn new<T, S>(token: T, secret: S) -> Self
    where
        T: Into<String>,
        S: Into<String>,
    {
        Temporary {
            token: token.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Temporary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Temporary")
            .field("token", &self.token)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Long-lived credentials authorizing access to protected resources on
/// the resource owner's behalf.
#[derive(Clone, PartialEq, Eq)]
pub struct Access {
    token: String,
    secret: String,
}

impl Access {
    pub fn new<T, S>(token: T, secret: S) -> Self
    where
        T: Into<String>,
        S: Into<String>,
    {
        Access {
            token: token.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Access")
            .field("token", &self.token)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Common accessor for credentials carrying a token/secret pair, so the
/// signer accepts temporary and access credentials alike.
pub trait TokenCredential {
    fn token(&self) -> &str;
    fn secret(&self) -> &str;
}

impl TokenCredential for Temporary {
    fn token(&self) -> &str {
        &self.token
    }

    fn secret(&self) -> &str {
        &self.secret
    }
}

impl TokenCredential for Access {
    fn token(&self) -> &str {
        &self.token
    }

    fn secret(&self) -> &str {
        &self.secret
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_secrets() {
        let consumer = Consumer::new("9djdj82h48djs9d2", "j49sk3j29djd");
        let rendered = format!("{:?}", consumer);
        assert!(rendered.contains("9djdj82h48djs9d2"));
        assert!(!rendered.contains("j49sk3j29djd"));

        let access = Access::new("kkk9d7dh3k39sjv7", "dh893hdasih9");
        let rendered = format!("{:?}", access);
        assert!(rendered.contains("kkk9d7dh3k39sjv7"));
        assert!(!rendered.contains("dh893hdasih9"));
    }

    #[test]
    fn token_credential_exposes_pairs() {
        let temporary = Temporary::new("hh5s93j4hdidpola", "hdhd0244k9j7ao03");
        assert_eq!(temporary.token(), "hh5s93j4hdidpola");
        assert_eq!(temporary.secret(), "hdhd0244k9j7ao03");
    }
}
