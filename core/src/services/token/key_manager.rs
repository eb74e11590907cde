//! ES256 key management for JWT signing and verification
//!
//! Keys are read through a [`KeySource`] and parsed lazily, at most once per
//! provider. A failed load is memoized as well, so every caller observes the
//! same [`KeyError`] without re-reading the source.

use std::fs;
use std::path::PathBuf;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use jsonwebtoken::{DecodingKey, EncodingKey};
use once_cell::sync::OnceCell;

use crate::errors::{KeyError, KeyKind};

const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";
const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";

/// Location key material is read from
pub trait KeySource: Send + Sync {
    /// Returns the raw PEM bytes for one half of the keypair
    fn read(&self, kind: KeyKind) -> Result<Vec<u8>, KeyError>;
}

/// Reads PEM files from disk
#[derive(Debug, Clone)]
pub struct FileKeySource {
    private_key_path: PathBuf,
    public_key_path: PathBuf,
}

impl FileKeySource {
    pub fn new(private_key_path: impl Into<PathBuf>, public_key_path: impl Into<PathBuf>) -> Self {
        Self {
            private_key_path: private_key_path.into(),
            public_key_path: public_key_path.into(),
        }
    }

    fn path(&self, kind: KeyKind) -> &PathBuf {
        match kind {
            KeyKind::Private => &self.private_key_path,
            KeyKind::Public => &self.public_key_path,
        }
    }
}

impl KeySource for FileKeySource {
    fn read(&self, kind: KeyKind) -> Result<Vec<u8>, KeyError> {
        let path = self.path(kind);
        fs::read(path).map_err(|e| KeyError::SourceMissing {
            kind,
            location: format!("{} ({})", path.display(), e),
        })
    }
}

/// Holds PEM strings in memory (embedded keys, tests)
#[derive(Debug, Clone, Default)]
pub struct PemKeySource {
    private_key_pem: Option<String>,
    public_key_pem: Option<String>,
}

impl PemKeySource {
    pub fn new(private_key_pem: impl Into<String>, public_key_pem: impl Into<String>) -> Self {
        Self {
            private_key_pem: Some(private_key_pem.into()),
            public_key_pem: Some(public_key_pem.into()),
        }
    }

    /// A source that can only verify
    pub fn public_only(public_key_pem: impl Into<String>) -> Self {
        Self {
            private_key_pem: None,
            public_key_pem: Some(public_key_pem.into()),
        }
    }
}

impl KeySource for PemKeySource {
    fn read(&self, kind: KeyKind) -> Result<Vec<u8>, KeyError> {
        let pem = match kind {
            KeyKind::Private => self.private_key_pem.as_ref(),
            KeyKind::Public => self.public_key_pem.as_ref(),
        };
        pem.map(|p| p.as_bytes().to_vec())
            .ok_or_else(|| KeyError::SourceMissing {
                kind,
                location: "memory".to_string(),
            })
    }
}

/// Owner of the signing keypair
///
/// Shared between tasks behind an `Arc`; each half is loaded on first use.
pub struct KeyProvider {
    source: Box<dyn KeySource>,
    encoding_key: OnceCell<Result<EncodingKey, KeyError>>,
    decoding_key: OnceCell<Result<DecodingKey, KeyError>>,
}

impl std::fmt::Debug for KeyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyProvider")
            .field("private_loaded", &self.encoding_key.get().is_some())
            .field("public_loaded", &self.decoding_key.get().is_some())
            .finish()
    }
}

impl KeyProvider {
    /// Creates a provider over an arbitrary key source
    pub fn new(source: impl KeySource + 'static) -> Self {
        Self {
            source: Box::new(source),
            encoding_key: OnceCell::new(),
            decoding_key: OnceCell::new(),
        }
    }

    /// Creates a provider reading PEM files
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ks_core::services::token::KeyProvider;
    ///
    /// let keys = KeyProvider::from_files(
    ///     "keys/jwt_private_key.pem",
    ///     "keys/jwt_public_key.pem",
    /// );
    /// keys.preload().expect("signing keys unavailable");
    /// ```
    pub fn from_files(
        private_key_path: impl Into<PathBuf>,
        public_key_path: impl Into<PathBuf>,
    ) -> Self {
        Self::new(FileKeySource::new(private_key_path, public_key_path))
    }

    /// Creates a provider from PEM strings (useful for testing or embedded keys)
    pub fn from_pem_strings(private_key_pem: &str, public_key_pem: &str) -> Self {
        Self::new(PemKeySource::new(private_key_pem, public_key_pem))
    }

    /// Returns the signing key, loading it on first use
    pub fn private_key(&self) -> Result<&EncodingKey, KeyError> {
        self.encoding_key
            .get_or_init(|| self.load(KeyKind::Private, parse_private_key))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Returns the verification key, loading it on first use
    pub fn public_key(&self) -> Result<&DecodingKey, KeyError> {
        self.decoding_key
            .get_or_init(|| self.load(KeyKind::Public, parse_public_key))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Forces both keys to load so startup can fail before serving traffic
    pub fn preload(&self) -> Result<(), KeyError> {
        self.private_key()?;
        self.public_key()?;
        Ok(())
    }

    fn load<K>(
        &self,
        kind: KeyKind,
        parse: fn(&[u8]) -> Result<K, KeyError>,
    ) -> Result<K, KeyError> {
        let result = self.source.read(kind).and_then(|pem| parse(&pem));
        match &result {
            Ok(_) => tracing::info!(key = %kind, "Signing key loaded"),
            Err(e) => tracing::error!(key = %kind, error = %e, "Failed to load signing key"),
        }
        result
    }
}

fn parse_private_key(pem: &[u8]) -> Result<EncodingKey, KeyError> {
    let kind = KeyKind::Private;
    check_envelope(pem, kind, PRIVATE_KEY_LABEL)?;
    EncodingKey::from_ec_pem(pem).map_err(|e| KeyError::WrongKeyType {
        kind,
        detail: format!("expected a P-256 EC key: {}", e),
    })
}

fn parse_public_key(pem: &[u8]) -> Result<DecodingKey, KeyError> {
    let kind = KeyKind::Public;
    check_envelope(pem, kind, PUBLIC_KEY_LABEL)?;
    DecodingKey::from_ec_pem(pem).map_err(|e| KeyError::WrongKeyType {
        kind,
        detail: format!("expected a P-256 EC key: {}", e),
    })
}

/// Validates the PEM framing before the key parser sees it
///
/// jsonwebtoken reports every parse failure as the same error kind, so the
/// envelope is checked here to keep a malformed file apart from a key of
/// the wrong type.
fn check_envelope(pem: &[u8], kind: KeyKind, expected_label: &str) -> Result<(), KeyError> {
    let malformed = |detail: String| KeyError::MalformedEnvelope { kind, detail };

    let text = std::str::from_utf8(pem).map_err(|_| malformed("not UTF-8".to_string()))?;
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

    let begin = lines
        .next()
        .and_then(|l| l.strip_prefix("-----BEGIN "))
        .and_then(|l| l.strip_suffix("-----"))
        .ok_or_else(|| malformed("missing BEGIN line".to_string()))?;

    let mut body = String::new();
    let mut end = None;
    for line in lines.by_ref() {
        if let Some(label) = line
            .strip_prefix("-----END ")
            .and_then(|l| l.strip_suffix("-----"))
        {
            end = Some(label);
            break;
        }
        if !line
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'=')
        {
            return Err(malformed("invalid base64 body".to_string()));
        }
        body.push_str(line);
    }

    let end = end.ok_or_else(|| malformed("missing END line".to_string()))?;
    if begin != end {
        return Err(malformed(format!("BEGIN {} does not match END {}", begin, end)));
    }
    if body.is_empty() || body.len() % 4 != 0 {
        return Err(malformed("truncated base64 body".to_string()));
    }

    let der = BASE64
        .decode(&body)
        .map_err(|e| malformed(format!("invalid base64 body: {}", e)))?;
    if !is_der_sequence(&der) {
        return Err(malformed("body is not a DER sequence".to_string()));
    }

    if begin != expected_label {
        return Err(match begin {
            "EC PRIVATE KEY" => malformed("SEC1 envelope, convert to PKCS#8".to_string()),
            _ => KeyError::WrongKeyType {
                kind,
                detail: format!("expected {}, found {}", expected_label, begin),
            },
        });
    }

    Ok(())
}

/// Whether `der` is exactly one DER SEQUENCE with a consistent length
///
/// Both key envelopes wrap a single top-level SEQUENCE; its contents are
/// left to the key parser.
fn is_der_sequence(der: &[u8]) -> bool {
    const SEQUENCE: u8 = 0x30;

    let (tag, rest) = match der.split_first() {
        Some((&tag, rest)) => (tag, rest),
        None => return false,
    };
    let (&first, rest) = match rest.split_first() {
        Some(split) => split,
        None => return false,
    };

    let (len, contents) = if first & 0x80 == 0 {
        (first as usize, rest)
    } else {
        let octets = (first & 0x7f) as usize;
        if octets == 0 || octets > 4 || rest.len() < octets {
            return false;
        }
        let (len_bytes, contents) = rest.split_at(octets);
        let len = len_bytes
            .iter()
            .fold(0usize, |acc, &b| (acc << 8) | b as usize);
        (len, contents)
    };

    tag == SEQUENCE && len == contents.len()
}
