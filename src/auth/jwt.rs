/// Token Service
///
/// Issues and verifies the signed, expiring tokens of the session
/// lifecycle. Access and refresh tokens are independent signing contexts:
/// each has its own secret key and TTL, injected at construction through
/// [`JwtSettings`].

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::Claims;
use crate::configuration::JwtSettings;
use crate::error::{AppError, TokenError};

/// Signs and verifies session tokens. Pure logic, no I/O.
#[derive(Clone)]
pub struct TokenService {
    config: JwtSettings,
}

impl TokenService {
    pub fn new(config: JwtSettings) -> Self {
        Self { config }
    }

    /// Issue a signed access token for a username
    ///
    /// # Errors
    /// Returns error if token signing fails
    pub fn issue_access_token(&self, username: &str) -> Result<String, AppError> {
        self.issue(
            username,
            &self.config.access_secret,
            self.config.access_token_expiry,
        )
    }

    /// Issue a signed refresh token for a username
    ///
    /// # Errors
    /// Returns error if token signing fails
    pub fn issue_refresh_token(&self, username: &str) -> Result<String, AppError> {
        self.issue(
            username,
            &self.config.refresh_secret,
            self.config.refresh_token_expiry,
        )
    }

    /// Validate signature and expiry of an access token and extract its claims
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        verify(token, &self.config.access_secret)
    }

    /// Validate signature and expiry of a refresh token and extract its claims
    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, TokenError> {
        verify(token, &self.config.refresh_secret)
    }

    /// Extract claims WITHOUT verifying the signature or expiry.
    ///
    /// The output is not proof of authenticity and must never decide an
    /// auth outcome. It exists to attribute a rejected or unverified token
    /// in log output; any trust in the claims requires one of the verify
    /// methods first.
    pub fn decode_unverified(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims = std::collections::HashSet::new();

        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(map_jwt_error)
    }

    fn issue(&self, username: &str, secret: &str, expiry_seconds: i64) -> Result<String, AppError> {
        let claims = Claims::new(username.to_string(), expiry_seconds);

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }
}

fn verify(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(map_jwt_error)
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> TokenError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_config() -> JwtSettings {
        JwtSettings {
            access_secret: "access-test-secret-at-least-32-chars".to_string(),
            refresh_secret: "refresh-test-secret-at-least-32-chars".to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 604800,
        }
    }

    #[test]
    fn test_issue_and_verify_access_token() {
        let service = TokenService::new(get_test_config());

        let token = service
            .issue_access_token("alice")
            .expect("Failed to issue token");
        let claims = service
            .verify_access_token(&token)
            .expect("Failed to verify token");

        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn test_issue_and_verify_refresh_token() {
        let service = TokenService::new(get_test_config());

        let token = service
            .issue_refresh_token("alice")
            .expect("Failed to issue token");
        let claims = service
            .verify_refresh_token(&token)
            .expect("Failed to verify token");

        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp, claims.iat + 604800);
    }

    #[test]
    fn test_contexts_are_independent() {
        let service = TokenService::new(get_test_config());

        let access = service.issue_access_token("alice").unwrap();
        let refresh = service.issue_refresh_token("alice").unwrap();

        // A token from one context must not verify in the other
        assert_eq!(
            service.verify_refresh_token(&access),
            Err(TokenError::InvalidSignature)
        );
        assert_eq!(
            service.verify_access_token(&refresh),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_expired_token() {
        let mut config = get_test_config();
        // Past the 60s validation leeway
        config.refresh_token_expiry = -3600;
        let service = TokenService::new(config);

        let token = service.issue_refresh_token("alice").unwrap();

        assert_eq!(
            service.verify_refresh_token(&token),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_tampered_token() {
        let service = TokenService::new(get_test_config());

        let token = service.issue_access_token("alice").unwrap();
        let tampered = format!("{}X", token);

        assert!(service.verify_access_token(&tampered).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service = TokenService::new(get_test_config());
        let mut other_config = get_test_config();
        other_config.access_secret = "a-completely-different-secret-value!".to_string();
        let other = TokenService::new(other_config);

        let token = other.issue_access_token("alice").unwrap();

        assert_eq!(
            service.verify_access_token(&token),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_decode_unverified_ignores_signature_and_expiry() {
        let mut config = get_test_config();
        config.access_token_expiry = -3600;
        config.access_secret = "some-other-secret-nobody-here-knows".to_string();
        let foreign = TokenService::new(config);
        let service = TokenService::new(get_test_config());

        // Expired and signed with a foreign key, yet the payload still decodes
        let token = foreign.issue_access_token("mallory").unwrap();
        let claims = service
            .decode_unverified(&token)
            .expect("Failed to decode payload");

        assert_eq!(claims.username, "mallory");
        // ...while verification rightly refuses it
        assert!(service.verify_access_token(&token).is_err());
    }

    #[test]
    fn test_garbage_is_malformed() {
        let service = TokenService::new(get_test_config());

        assert!(matches!(
            service.verify_access_token("not.a.token"),
            Err(TokenError::Malformed(_))
        ));
        assert!(service.decode_unverified("garbage").is_err());
    }
}
