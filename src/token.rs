use std::fmt;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::authenticator::GrantResponse;
use crate::error::{ErrorDetails, FinAutError};

pub type AccessToken = String;

/// Buffer subtracted from the expiry timestamp so a token is never used when
/// it could expire mid-flight (clock skew plus request latency).
pub(crate) const SAFETY_MARGIN: TimeDelta = TimeDelta::seconds(60);

/// Access token obtained through the client-credentials grant. Owned by the
/// token manager and replaced wholesale on refresh.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Token {
    expires_at: DateTime<Utc>,
    access_token: AccessToken,
}

impl Token {
    pub fn new(access_token: AccessToken, expires_at: DateTime<Utc>) -> Self {
        Token {
            access_token,
            expires_at,
        }
    }

    /// A token counts as expired once it enters the safety margin before its
    /// actual expiry.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at - SAFETY_MARGIN
    }

    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bearer {}", self.access_token)
    }
}

impl TryFrom<GrantResponse> for Token {
    type Error = FinAutError;

    fn try_from(response: GrantResponse) -> Result<Self, Self::Error> {
        // `expires_in` is a lifetime in seconds.
        let time_delta = TimeDelta::from_std(Duration::from_secs(response.expires_in))
            .map_err(|e| FinAutError::Authentication(ErrorDetails::new(e.to_string())))?;

        let expires_at = Utc::now().checked_add_signed(time_delta).ok_or_else(|| {
            FinAutError::Authentication(ErrorDetails::new(
                "failed to calculate token expiration time",
            ))
        })?;

        Ok(Token::new(response.access_token, expires_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Duration;

    #[test]
    fn token_is_expired() {
        let past = Utc::now() - Duration::milliseconds(10);
        let token = Token::new(AccessToken::from("some-token"), past);
        assert!(token.is_expired())
    }

    #[test]
    fn token_inside_safety_margin_is_expired() {
        // Nominally still alive, but within the 60s margin.
        let expires_at = Utc::now() + Duration::seconds(30);
        let token = Token::new(AccessToken::from("some-token"), expires_at);
        assert!(token.is_expired())
    }

    #[test]
    fn token_is_not_expired() {
        let expires_at = Utc::now() + SAFETY_MARGIN + Duration::seconds(10);
        let token = Token::new(AccessToken::from("some-token"), expires_at);
        assert!(!token.is_expired())
    }

    #[test]
    fn grant_response_with_out_of_range_expiry() {
        let response = GrantResponse {
            access_token: "some-token".to_string(),
            expires_in: u64::MAX,
        };
        let result = Token::try_from(response);
        assert_matches!(result, Err(FinAutError::Authentication(_)));
    }

    #[test]
    fn grant_response_produces_future_expiry() {
        let response = GrantResponse {
            access_token: "some-token".to_string(),
            expires_in: 3600,
        };
        let token = Token::try_from(response).unwrap();
        assert_eq!(token.access_token(), "some-token");
        assert!(!token.is_expired());
        assert!(token.expires_at() <= Utc::now() + Duration::seconds(3600));
    }
}
