use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;

use jotter_types::api::Claims;

use crate::{AuthConfig, AuthError};

/// Tokens are valid for a week from issue.
pub const TOKEN_LIFETIME_DAYS: i64 = 7;

/// The only algorithm accepted, whatever a token's header claims.
const ALGORITHM: Algorithm = Algorithm::HS256;

pub fn issue_token(config: &AuthConfig, user_id: i64) -> Result<String, AuthError> {
    issue_token_at(config, user_id, Utc::now())
}

/// Issue a token as if the current time were `now`.
pub fn issue_token_at(
    config: &AuthConfig,
    user_id: i64,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    if config.secret().is_empty() {
        return Err(AuthError::Signing("signing secret is empty".into()));
    }

    let claims = Claims {
        sub: user_id,
        iat: now.timestamp() as usize,
        exp: (now + Duration::days(TOKEN_LIFETIME_DAYS)).timestamp() as usize,
    };

    encode(
        &Header::new(ALGORITHM),
        &claims,
        &EncodingKey::from_secret(config.secret()),
    )
    .map_err(|e| AuthError::Signing(e.to_string()))
}

/// Verify signature, algorithm and expiry. Every failure collapses into
/// [`AuthError::Unauthorized`].
pub fn validate_token(config: &AuthConfig, token: &str) -> Result<Claims, AuthError> {
    if config.secret().is_empty() {
        return Err(AuthError::Unauthorized);
    }

    let mut validation = Validation::new(ALGORITHM);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    decode::<Claims>(token, &DecodingKey::from_secret(config.secret()), &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            debug!("Rejected bearer token: {}", e);
            AuthError::Unauthorized
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64URL;

    fn config() -> AuthConfig {
        AuthConfig::new("test-secret")
    }

    fn forge(header: &str, claims: &Claims, signature: &str) -> String {
        let payload = serde_json::to_vec(claims).unwrap();
        format!(
            "{}.{}.{}",
            B64URL.encode(header),
            B64URL.encode(payload),
            signature
        )
    }

    #[test]
    fn issue_validate_roundtrip() {
        for uid in [0, 1, 42, i64::MAX] {
            let token = issue_token(&config(), uid).unwrap();
            let claims = validate_token(&config(), &token).unwrap();
            assert_eq!(claims.sub, uid);
        }
    }

    #[test]
    fn short_secret_works() {
        let cfg = AuthConfig::new("k");
        let token = issue_token(&cfg, 7).unwrap();
        assert_eq!(validate_token(&cfg, &token).unwrap().sub, 7);
    }

    #[test]
    fn expiry_is_seven_days_after_issue() {
        let now = Utc::now();
        let token = issue_token_at(&config(), 3, now).unwrap();
        let claims = validate_token(&config(), &token).unwrap();
        assert_eq!(claims.iat, now.timestamp() as usize);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn empty_secret_cannot_sign() {
        let err = issue_token(&AuthConfig::new(""), 1).unwrap_err();
        assert!(matches!(err, AuthError::Signing(_)));
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = issue_token(&config(), 1).unwrap();
        let err = validate_token(&AuthConfig::new("other-secret"), &token).unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[test]
    fn expired_token_rejected() {
        let issued = Utc::now() - Duration::days(TOKEN_LIFETIME_DAYS + 1);
        let token = issue_token_at(&config(), 1, issued).unwrap();
        assert!(matches!(
            validate_token(&config(), &token),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn token_near_end_of_life_still_valid() {
        let issued = Utc::now() - Duration::days(TOKEN_LIFETIME_DAYS - 1);
        let token = issue_token_at(&config(), 9, issued).unwrap();
        assert_eq!(validate_token(&config(), &token).unwrap().sub, 9);
    }

    #[test]
    fn garbage_rejected() {
        for token in ["", "abc", "a.b.c", "Bearer xyz"] {
            assert!(matches!(
                validate_token(&config(), token),
                Err(AuthError::Unauthorized)
            ));
        }
    }

    #[test]
    fn tampered_payload_rejected() {
        let token = issue_token(&config(), 1).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let claims = Claims {
            sub: 2,
            iat: Utc::now().timestamp() as usize,
            exp: (Utc::now() + Duration::days(1)).timestamp() as usize,
        };
        let forged_payload = B64URL.encode(serde_json::to_vec(&claims).unwrap());
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);
        assert!(matches!(
            validate_token(&config(), &forged),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn unsigned_none_algorithm_rejected() {
        let claims = Claims {
            sub: 1,
            iat: Utc::now().timestamp() as usize,
            exp: (Utc::now() + Duration::days(1)).timestamp() as usize,
        };
        let forged = forge(r#"{"alg":"none","typ":"JWT"}"#, &claims, "");
        assert!(matches!(
            validate_token(&config(), &forged),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn other_algorithm_rejected_even_with_valid_signature() {
        let claims = Claims {
            sub: 1,
            iat: Utc::now().timestamp() as usize,
            exp: (Utc::now() + Duration::days(1)).timestamp() as usize,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(matches!(
            validate_token(&config(), &token),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn swapped_header_rejected() {
        let token = issue_token(&config(), 1).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let header = B64URL.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
        let forged = format!("{}.{}.{}", header, parts[1], parts[2]);
        assert!(matches!(
            validate_token(&config(), &forged),
            Err(AuthError::Unauthorized)
        ));
    }
}
