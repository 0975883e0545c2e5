//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use sitewit_domain::{ErrorDetails, SiteWitError};

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SiteWitError);

impl From<InfraError> for SiteWitError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SiteWitError> for InfraError {
    fn from(value: SiteWitError) -> Self {
        InfraError(value)
    }
}

trait IntoSiteWitError {
    fn into_sitewit(self) -> SiteWitError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → SiteWitError */
/* -------------------------------------------------------------------------- */

impl IntoSiteWitError for HttpError {
    fn into_sitewit(self) -> SiteWitError {
        if self.is_timeout() {
            return SiteWitError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return SiteWitError::Network(format!("HTTP connection failure: {self}"));
        }

        if let Some(status) = self.status() {
            let message =
                status.canonical_reason().unwrap_or("unknown status").to_string();
            return SiteWitError::Http {
                status: status.as_u16(),
                details: ErrorDetails { message: Some(message), ..Default::default() },
            };
        }

        if self.is_decode() {
            return SiteWitError::Decode(format!("invalid response body: {self}"));
        }

        if self.is_builder() {
            return SiteWitError::InvalidArgument(format!("invalid request: {self}"));
        }

        SiteWitError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_sitewit())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → SiteWitError */
/* -------------------------------------------------------------------------- */

impl IntoSiteWitError for JsonError {
    fn into_sitewit(self) -> SiteWitError {
        if self.is_data() {
            SiteWitError::Decode(format!("unexpected JSON shape: {self}"))
        } else {
            SiteWitError::Decode(format!("malformed JSON: {self}"))
        }
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_sitewit())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
