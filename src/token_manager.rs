use std::sync::Mutex;

use tracing::debug;

use crate::authenticator::Authenticator;
use crate::error::{ErrorDetails, FinAutError};
use crate::token::Token;

/// Maintains exactly one current token per client instance. The lock is held
/// across the refresh so concurrent callers converge on a single grant
/// request instead of racing to fetch their own.
#[derive(Debug)]
pub struct TokenManager<A>
where
    A: Authenticator,
{
    tokens: Mutex<Option<Token>>,
    authenticator: A,
}

impl<A> TokenManager<A>
where
    A: Authenticator,
{
    pub fn new(authenticator: A) -> Self {
        Self {
            tokens: Mutex::new(None),
            authenticator,
        }
    }

    /// Returns a token guaranteed valid at call time, acquiring or refreshing
    /// one through the client-credentials grant when needed.
    pub fn get_valid_token(&self) -> Result<Token, FinAutError> {
        let mut cached_token = self
            .tokens
            .lock()
            .map_err(|_| FinAutError::Authentication(ErrorDetails::new("token cache lock poisoned")))?;

        if cached_token.as_ref().is_none_or(Token::is_expired) {
            let response = self.authenticator.authenticate()?;
            let token = Token::try_from(response)?;
            debug!(expires_at = %token.expires_at(), "authorization token refreshed");
            *cached_token = Some(token);
        }

        cached_token
            .clone()
            .ok_or_else(|| FinAutError::Authentication(ErrorDetails::new("getting token from cache")))
    }

    /// Unconditionally discards the current token, forcing the next
    /// [`Self::get_valid_token`] to re-acquire. Used after a request comes
    /// back 401 despite a locally valid token.
    pub fn invalidate(&self) {
        let mut cached_token = self
            .tokens
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if cached_token.take().is_some() {
            debug!("authorization token invalidated");
        }
    }
}
