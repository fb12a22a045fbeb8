//! Token 签发与校验：`base64url(header).base64url(claims).base64url(hmac)`。

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use ids_shared_protocol::{TOKEN_ALG, TokenClaims, TokenHeader, unix_now};
use serde::Serialize;
use sha2::Sha256;

use crate::error::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// 无状态令牌引擎：只持有不可变的签名密钥与 TTL。
pub(crate) struct TokenEngine {
    secret: Vec<u8>,
    ttl_sec: u64,
}

impl std::fmt::Debug for TokenEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenEngine")
            .field("secret", &"<redacted>")
            .field("ttl_sec", &self.ttl_sec)
            .finish()
    }
}

impl TokenEngine {
    /// 构造令牌引擎；TTL 对所有签发的令牌一致生效。
    pub(crate) fn new(secret: impl AsRef<[u8]>, ttl_sec: u64) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            ttl_sec,
        }
    }

    /// 令牌有效期（秒）。
    pub(crate) fn ttl_sec(&self) -> u64 {
        self.ttl_sec
    }

    /// 以当前时间签发令牌。
    pub(crate) fn issue(&self, user_id: &str, username: &str) -> Result<String, AuthError> {
        self.issue_at(user_id, username, unix_now())
    }

    /// 以指定时间签发令牌。
    pub(crate) fn issue_at(
        &self,
        user_id: &str,
        username: &str,
        now: u64,
    ) -> Result<String, AuthError> {
        let claims = TokenClaims {
            user_id: user_id.to_string(),
            username: username.to_string(),
            exp: now.saturating_add(self.ttl_sec),
            iat: now,
        };
        let header_b64 = encode_segment(&TokenHeader::default())?;
        let claims_b64 = encode_segment(&claims)?;
        let signing_input = format!("{header_b64}.{claims_b64}");

        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let sig_b64 = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{signing_input}.{sig_b64}"))
    }

    /// 以当前时间校验令牌。
    pub(crate) fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.verify_at(token, unix_now())
    }

    /// 以指定时间校验令牌：格式、签名、header、claims、过期，依次判定。
    pub(crate) fn verify_at(&self, token: &str, now: u64) -> Result<TokenClaims, AuthError> {
        let mut parts = token.split('.');
        let header_b64 = parts.next().unwrap_or_default();
        let claims_b64 = parts.next().unwrap_or_default();
        let sig_b64 = parts.next().unwrap_or_default();
        if header_b64.is_empty()
            || claims_b64.is_empty()
            || sig_b64.is_empty()
            || parts.next().is_some()
        {
            return Err(AuthError::MalformedToken);
        }

        let sig = URL_SAFE_NO_PAD
            .decode(sig_b64.as_bytes())
            .map_err(|_| AuthError::InvalidSignature)?;
        let mut mac = self.mac()?;
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(claims_b64.as_bytes());
        // verify_slice 为常量时间比较。
        mac.verify_slice(&sig)
            .map_err(|_| AuthError::InvalidSignature)?;

        let header: TokenHeader = decode_segment(header_b64)?;
        if header.alg != TOKEN_ALG {
            return Err(AuthError::MalformedToken);
        }
        let claims: TokenClaims = decode_segment(claims_b64)?;

        if now >= claims.exp {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }

    fn mac(&self) -> Result<HmacSha256, AuthError> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|err| AuthError::internal(format!("init token signer failed: {err}")))
    }
}

/// JSON 序列化后做 base64url 编码。
fn encode_segment<T: Serialize>(value: &T) -> Result<String, AuthError> {
    let raw = serde_json::to_vec(value)
        .map_err(|err| AuthError::internal(format!("encode token segment failed: {err}")))?;
    Ok(URL_SAFE_NO_PAD.encode(raw))
}

/// base64url 解码后反序列化；任一步失败都视为格式错误。
fn decode_segment<T: serde::de::DeserializeOwned>(segment: &str) -> Result<T, AuthError> {
    let raw = URL_SAFE_NO_PAD
        .decode(segment.as_bytes())
        .map_err(|_| AuthError::MalformedToken)?;
    serde_json::from_slice(&raw).map_err(|_| AuthError::MalformedToken)
}
