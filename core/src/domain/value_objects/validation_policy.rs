//! Verification constraints applied on top of signature and expiry checks.

use chrono::Duration;

/// Which registered claims a verification must additionally constrain
///
/// Built per call. `None` fields are not checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub issuer: Option<String>,
    pub subject: Option<String>,
    pub audience: Option<String>,
    /// Clock skew tolerance applied to `exp` and `iat`
    pub leeway: Duration,
    /// Reject tokens whose `iat` lies beyond `now + leeway`
    pub require_issued_at: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            issuer: None,
            subject: None,
            audience: None,
            leeway: Duration::zero(),
            require_issued_at: false,
        }
    }
}

impl ValidationPolicy {
    /// A policy that checks nothing beyond signature, structure and expiry
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    pub fn require_issued_at(mut self) -> Self {
        self.require_issued_at = true;
        self
    }

    /// Leeway in whole seconds, negative values clamped to zero
    pub fn leeway_secs(&self) -> u64 {
        self.leeway.num_seconds().max(0) as u64
    }
}
