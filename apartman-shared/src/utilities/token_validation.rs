use std::collections::HashMap;

use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iss: String,
}

async fn fetch_jwks(jwks_url: &str) -> Result<HashMap<String, (String, String)>, String> {
    let client = reqwest::Client::new();
    let response = client
        .get(jwks_url)
        .send()
        .await
        .map_err(|e| format!("Failed to fetch JWKS: {}", e))?;
    let jwks: serde_json::Value = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse JWKS: {}", e))?;

    let mut keys = HashMap::new();
    if let Some(keys_array) = jwks["keys"].as_array() {
        for key in keys_array {
            if let (Some(kid), Some(n), Some(e)) = (
                key["kid"].as_str(),
                key["n"].as_str(),
                key["e"].as_str(),
            ) {
                keys.insert(kid.to_string(), (n.to_string(), e.to_string()));
            }
        }
    }
    Ok(keys)
}

/// Validates a Cognito-issued RS256 access token against the pool's JWKS and
/// returns its claims. The `sub` claim doubles as the profile document id.
pub async fn validate_bearer_token(
    token: &str,
    user_pool_id: &str,
    region: &str,
) -> Result<Claims, String> {
    let issuer = format!("https://cognito-idp.{}.amazonaws.com/{}", region, user_pool_id);
    let jwks_url = format!("{}/.well-known/jwks.json", issuer);

    let header = decode_header(token).map_err(|e| format!("Failed to decode header: {}", e))?;
    let kid = header.kid.ok_or_else(|| "Token header missing kid".to_string())?;

    let keys = fetch_jwks(&jwks_url).await?;
    let (n, e) = keys
        .get(&kid)
        .ok_or_else(|| format!("No JWKS entry for kid {}", kid))?;

    let decoding_key = DecodingKey::from_rsa_components(n, e)
        .map_err(|e| format!("Failed to build decoding key: {}", e))?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_issuer(&[&issuer]);

    let data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| format!("Token validation failed: {}", e))?;

    Ok(data.claims)
}
