//! Partner credential headers
//!
//! Every call carries a `PartnerAuth` header: base64 of the colon-joined
//! partner id, partner token and an optional scope token. The scope token is
//! an account token for account calls or a sub-partner id for sub-partner
//! calls. Calls scoped to a caller-assigned sub-partner id send that id
//! separately in `RemoteSubPartnerId`.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sitewit_domain::constants::{PARTNER_AUTH_HEADER, REMOTE_SUBPARTNER_ID_HEADER};
use sitewit_domain::{Result, SiteWitError, SubPartnerRef};

/// Partner id and secret token issued by SiteWit
#[derive(Clone, PartialEq, Eq)]
pub struct PartnerCredentials {
    partner_id: String,
    partner_token: String,
}

impl PartnerCredentials {
    /// Credentials from the partner id and token shown in the partner portal.
    pub fn new(partner_id: impl Into<String>, partner_token: impl Into<String>) -> Self {
        Self { partner_id: partner_id.into(), partner_token: partner_token.into() }
    }

    /// Partner id; the token is never exposed.
    pub fn partner_id(&self) -> &str {
        &self.partner_id
    }
}

impl fmt::Debug for PartnerCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartnerCredentials")
            .field("partner_id", &self.partner_id)
            .field("partner_token", &"<redacted>")
            .finish()
    }
}

/// Header name/value pairs for one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthHeaders(Vec<(&'static str, String)>);

impl AuthHeaders {
    /// Value of the header `name`, matched case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }

    /// Number of headers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for AuthHeaders {
    type Item = (&'static str, String);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Builds authorization headers for the three scopes the API knows.
#[derive(Debug, Clone)]
pub struct AuthHeaderComposer {
    credentials: PartnerCredentials,
}

impl AuthHeaderComposer {
    /// Composer signing every header with `credentials`.
    pub fn new(credentials: PartnerCredentials) -> Self {
        Self { credentials }
    }

    /// Credentials used for signing.
    pub fn credentials(&self) -> &PartnerCredentials {
        &self.credentials
    }

    /// Headers for a call acting on one account.
    pub fn account_auth_header(&self, account_token: &str) -> AuthHeaders {
        AuthHeaders(vec![(PARTNER_AUTH_HEADER, self.encode(Some(account_token)))])
    }

    /// Headers for a partner-level call, optionally narrowed to a sub-partner.
    ///
    /// A sub-partner is addressed by its generated id or by its remote id,
    /// never both.
    pub fn partner_auth_header(
        &self,
        subpartner_id: Option<&str>,
        remote_subpartner_id: Option<&str>,
    ) -> Result<AuthHeaders> {
        if subpartner_id.is_some() && remote_subpartner_id.is_some() {
            return Err(SiteWitError::invalid_argument(
                "only one of subpartner_id or remote_subpartner_id may be specified",
            ));
        }

        let mut headers = vec![(PARTNER_AUTH_HEADER, self.encode(subpartner_id))];
        if let Some(remote_id) = remote_subpartner_id {
            headers.push((REMOTE_SUBPARTNER_ID_HEADER, STANDARD.encode(remote_id)));
        }

        Ok(AuthHeaders(headers))
    }

    /// Headers for a call scoped to the given sub-partner.
    pub fn subpartner_auth_header(&self, subpartner: &SubPartnerRef) -> AuthHeaders {
        match subpartner {
            SubPartnerRef::Id(id) => AuthHeaders(vec![(PARTNER_AUTH_HEADER, self.encode(Some(id)))]),
            SubPartnerRef::Remote(remote_id) => AuthHeaders(vec![
                (PARTNER_AUTH_HEADER, self.encode(None)),
                (REMOTE_SUBPARTNER_ID_HEADER, STANDARD.encode(remote_id)),
            ]),
        }
    }

    fn encode(&self, scope_token: Option<&str>) -> String {
        let mut raw = format!("{}:{}", self.credentials.partner_id, self.credentials.partner_token);
        if let Some(token) = scope_token {
            raw.push(':');
            raw.push_str(token);
        }
        STANDARD.encode(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composer() -> AuthHeaderComposer {
        AuthHeaderComposer::new(PartnerCredentials::new("P", "S"))
    }

    fn decode(value: &str) -> String {
        String::from_utf8(STANDARD.decode(value).unwrap()).unwrap()
    }

    #[test]
    fn test_account_header_encodes_all_three_parts() {
        let headers = composer().account_auth_header("A");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("PartnerAuth").unwrap(), "UDpTOkE=");
        assert_eq!(decode(headers.get("PartnerAuth").unwrap()), "P:S:A");
    }

    #[test]
    fn test_partner_header_without_scope() {
        let headers = composer().partner_auth_header(None, None).unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(decode(headers.get("PartnerAuth").unwrap()), "P:S");
    }

    #[test]
    fn test_partner_header_with_subpartner_id() {
        let headers = composer().partner_auth_header(Some("SUB"), None).unwrap();
        assert_eq!(decode(headers.get("PartnerAuth").unwrap()), "P:S:SUB");
        assert!(headers.get("RemoteSubPartnerId").is_none());
    }

    #[test]
    fn test_partner_header_with_remote_id() {
        let headers = composer().partner_auth_header(None, Some("R1")).unwrap();
        assert_eq!(decode(headers.get("PartnerAuth").unwrap()), "P:S");
        assert_eq!(decode(headers.get("RemoteSubPartnerId").unwrap()), "R1");
    }

    #[test]
    fn test_both_subpartner_ids_rejected() {
        let err = composer().partner_auth_header(Some("SUB"), Some("R1")).unwrap_err();
        assert!(matches!(err, SiteWitError::InvalidArgument(_)));
    }

    #[test]
    fn test_subpartner_ref_matches_optional_form() {
        let composer = composer();
        assert_eq!(
            composer.subpartner_auth_header(&SubPartnerRef::Id("SUB".into())),
            composer.partner_auth_header(Some("SUB"), None).unwrap()
        );
        assert_eq!(
            composer.subpartner_auth_header(&SubPartnerRef::Remote("R1".into())),
            composer.partner_auth_header(None, Some("R1")).unwrap()
        );
    }

    #[test]
    fn test_credentials_debug_redacts_token() {
        let rendered = format!("{:?}", PartnerCredentials::new("P", "very-secret"));
        assert!(!rendered.contains("very-secret"));
    }
}
