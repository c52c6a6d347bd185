//! Token minting helpers for tests.
//!
//! Two fixed RSA key pairs are bundled so tests can publish a key set from a
//! mock server and sign tokens that verify against it.

use crate::claims::Claims;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::{Value, json};

/// Key id of the primary signing key.
pub const KEY_ID: &str = "jwk-test-primary";

/// Key id of the secondary signing key, used to simulate rotation.
pub const ROTATED_KEY_ID: &str = "jwk-test-rotated";

/// PKCS#1 PEM of the primary signing key.
pub const KEY_PEM: &str = include_str!("../fixtures/signing_key_1.pem");

/// PKCS#1 PEM of the secondary signing key.
pub const ROTATED_KEY_PEM: &str = include_str!("../fixtures/signing_key_2.pem");

const KEY_MODULUS: &str = "xkX3Uy9hJdzNaDi15B3LOq7rRTu0UPFHYh-DG2hkezGmQzNXB9rPvQzsA1IJH99U0uRYRiPCgfqg3OvZ3Hn2XS3tCT-E7bDar-vzuUcV5KPu8WrBAvj4kKeCSKtdmBZzzOJMr6b6LFOy_cYjt5NqkgUj2XRpcAS2i_adT5eyw3fW1MEpwXKDDwjr8TZr9_PkwQRZqcjWqbLJjIJUCMtzSDVoom3iAOXIWBsjTRYWHSmBbbeQdye4qx76Qq219gbOoW1Cthx2CcUwRj46uLymdteY5C5mvIZVi8qzMdmkd4y7Ewf2vm7PeFTI48UMalWzrGrhACQyMd5ZbVhQn_QXRw";

const ROTATED_KEY_MODULUS: &str = "w2x6NZcN6FRgBNPj9YlFfxpYryTbgm2BseZvAGO1MlMJ2COai1ofPn35f6TkguPDb5UXm4vMzWIak-fIOuy-1YoYvBM9aijKvBuHB4CB4GT0n8QpP-_W5XKgbbPDg76Hye_nb_7peK5z99Pfw8Qx-S2iwrDSoDa5R8KpnzUxzJadjly_xFecROiFl0fd-VxbSZ81Gyf7kN_yJmLFNvdpCMAUgmfQcFfQIO9M6Z2tY3a0D_7B7Oa88Lm4e2zB5JSXHqZOtYEi3Nr2-j0NtGhy3zD3pUS36SAdKp1NZgAp2m4nLs0Z-GSMi7XTj8LdIP9NQrULWtIj6CbpjYPlxCe9wQ";

const PUBLIC_EXPONENT: &str = "AQAB";

fn modulus(kid: &str) -> &'static str {
    if kid == ROTATED_KEY_ID {
        ROTATED_KEY_MODULUS
    } else {
        KEY_MODULUS
    }
}

fn pem(kid: &str) -> &'static str {
    if kid == ROTATED_KEY_ID {
        ROTATED_KEY_PEM
    } else {
        KEY_PEM
    }
}

/// A key set document publishing the public halves of the given keys.
///
/// Any kid other than [`ROTATED_KEY_ID`] is published with the primary key.
pub fn jwks_json(kids: &[&str]) -> Value {
    let keys: Vec<Value> = kids
        .iter()
        .map(|kid| {
            json!({
                "kty": "RSA",
                "kid": kid,
                "use": "sig",
                "alg": "RS256",
                "n": modulus(kid),
                "e": PUBLIC_EXPONENT,
            })
        })
        .collect();
    json!({ "keys": keys })
}

/// Claims accepted for `project_id`, valid for one hour.
pub fn claims(project_id: &str, subject: &str) -> Claims {
    let now = Utc::now().timestamp();
    Claims {
        iss: format!("stytch.com/{project_id}"),
        sub: subject.to_string(),
        aud: vec![project_id.to_string()],
        scope: Some("openid email".to_string()),
        client_id: Some("connected-app-test-1".to_string()),
        exp: now + 3600,
        iat: Some(now),
        nbf: Some(now - 5),
        jti: None,
    }
}

/// Sign with the bundled key for `kid`.
pub fn sign(claims: &Claims, kid: &str) -> String {
    sign_with_key(claims, kid, pem(kid))
}

/// Sign with an explicit PEM, labelling the header with `kid`.
pub fn sign_with_key(claims: &Claims, kid: &str, pem: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    let key = EncodingKey::from_rsa_pem(pem.as_bytes()).expect("fixture key is valid PEM");
    encode(&header, claims, &key).expect("signing with fixture key")
}

/// Sign with the bundled key for `kid` and an arbitrary `typ` header.
pub fn sign_with_type(claims: &Claims, kid: &str, typ: Option<&str>) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    header.typ = typ.map(str::to_string);
    let key = EncodingKey::from_rsa_pem(pem(kid).as_bytes()).expect("fixture key is valid PEM");
    encode(&header, claims, &key).expect("signing with fixture key")
}

/// Sign with a shared secret using HS256.
pub fn sign_hs256(claims: &Claims, secret: &[u8]) -> String {
    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(KEY_ID.to_string());
    encode(&header, claims, &EncodingKey::from_secret(secret)).expect("signing with secret")
}
