//! Credential representations and the codec between them
//!
//! Credentials arrive in one of two forms: a transportable
//! [`CredentialRecord`] (the serialized OAuth2 shape) or a validated
//! [`LiveCredential`] session handle. The codec converts between them
//! losslessly and derives the one-way fingerprint that scopes cache keys
//! to a caller identity.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CredentialError;

/// Transportable OAuth2 credential record.
///
/// Field names on the wire match Google's authorized-user JSON shape.
/// May contain secrets: `Debug` redacts them and the record must never be
/// used verbatim as a cache key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// OAuth2 access token
    #[serde(rename = "token")]
    pub access_token: String,

    /// Refresh token, if the session can be renewed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Token endpoint URL used to redeem the refresh token
    #[serde(rename = "token_uri", skip_serializing_if = "Option::is_none")]
    pub token_endpoint: Option<String>,

    /// OAuth2 client ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// OAuth2 client secret
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    /// Granted scopes
    #[serde(default)]
    pub scopes: BTreeSet<String>,
}

impl CredentialRecord {
    /// Check that the record is complete enough to open a session.
    ///
    /// A refresh token without a token endpoint can never be redeemed, and
    /// a token endpoint must be an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), CredentialError> {
        if self.access_token.is_empty() {
            return Err(CredentialError::MissingAccessToken);
        }
        if self.refresh_token.is_some() && self.token_endpoint.is_none() {
            return Err(CredentialError::MissingTokenEndpoint);
        }
        if let Some(endpoint) = &self.token_endpoint
            && !(endpoint.starts_with("https://") || endpoint.starts_with("http://"))
        {
            return Err(CredentialError::MalformedTokenEndpoint);
        }
        Ok(())
    }

    /// Convert into a live session handle, validating first.
    pub fn into_live(self) -> Result<LiveCredential, CredentialError> {
        self.validate()?;
        Ok(LiveCredential {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            token_endpoint: self.token_endpoint,
            client_id: self.client_id,
            client_secret: self.client_secret,
            scopes: self.scopes,
        })
    }

    /// One-way stable digest of the caller identity.
    ///
    /// Covers every field, access token included: a refreshed token changes
    /// effective identity and must bust the cache. Fields are length-framed
    /// and optionals carry a presence tag, so no two distinct records
    /// collide by concatenation. The hex digest is safe to embed in cache
    /// keys and logs; the raw secrets are not recoverable from it.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();

        update_framed(&mut hasher, self.access_token.as_bytes());
        update_optional(&mut hasher, self.refresh_token.as_deref());
        update_optional(&mut hasher, self.token_endpoint.as_deref());
        update_optional(&mut hasher, self.client_id.as_deref());
        update_optional(&mut hasher, self.client_secret.as_deref());

        // BTreeSet iterates sorted, so scope insertion order is irrelevant
        hasher.update((self.scopes.len() as u64).to_le_bytes());
        for scope in &self.scopes {
            update_framed(&mut hasher, scope.as_bytes());
        }

        format!("{:x}", hasher.finalize())
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("token_endpoint", &self.token_endpoint)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("scopes", &self.scopes)
            .finish()
    }
}

fn update_framed(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

fn update_optional(hasher: &mut Sha256, value: Option<&str>) {
    match value {
        Some(v) => {
            hasher.update([1u8]);
            update_framed(hasher, v.as_bytes());
        }
        None => hasher.update([0u8]),
    }
}

/// Live authenticated session handle.
///
/// Constructed only through [`CredentialRecord::into_live`], so a value of
/// this type is always a validated credential. Opaque to the caching layer;
/// the provider capability reads the token through the accessors. Not
/// serializable and never persisted.
#[derive(Clone)]
pub struct LiveCredential {
    access_token: String,
    refresh_token: Option<String>,
    token_endpoint: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    scopes: BTreeSet<String>,
}

impl LiveCredential {
    /// Extract the transportable record form. Exact inverse of
    /// [`CredentialRecord::into_live`].
    pub fn to_record(&self) -> CredentialRecord {
        CredentialRecord {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            token_endpoint: self.token_endpoint.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            scopes: self.scopes.clone(),
        }
    }

    /// Current access token
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// `Authorization` header value for provider requests
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Granted scopes
    pub fn scopes(&self) -> &BTreeSet<String> {
        &self.scopes
    }
}

impl fmt::Debug for LiveCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveCredential")
            .field("access_token", &"<redacted>")
            .field("token_endpoint", &self.token_endpoint)
            .field("client_id", &self.client_id)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Credentials as accepted at the handler boundary: either representation.
///
/// Resolved exactly once per call into a live handle plus identity
/// fingerprint; nothing downstream branches on the variant again.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Transportable record form
    Record(CredentialRecord),
    /// Live session form
    Live(LiveCredential),
}

impl Credentials {
    /// Normalize to `(live handle, identity fingerprint)`.
    ///
    /// Validation failures surface here, before any remote call. Both
    /// representations of the same identity yield the same fingerprint.
    pub(crate) fn resolve(&self) -> Result<(LiveCredential, String), CredentialError> {
        match self {
            Credentials::Record(record) => {
                let live = record.clone().into_live()?;
                Ok((live, record.fingerprint()))
            }
            Credentials::Live(live) => {
                let fingerprint = live.to_record().fingerprint();
                Ok((live.clone(), fingerprint))
            }
        }
    }
}

impl From<CredentialRecord> for Credentials {
    fn from(record: CredentialRecord) -> Self {
        Credentials::Record(record)
    }
}

impl From<LiveCredential> for Credentials {
    fn from(live: LiveCredential) -> Self {
        Credentials::Live(live)
    }
}
