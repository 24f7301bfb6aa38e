use anyhow::Result;
use chrono::{Duration, Utc};

use crate::auth::{SessionClaims, sign};

/// Print a signed session token. Stands in for the identity provider
/// when running locally.
pub fn run(
    sub: &str,
    name: Option<&str>,
    email: Option<&str>,
    image: Option<&str>,
    ttl_secs: i64,
    secret: &str,
) -> Result<()> {
    let claims = SessionClaims::new(sub, Utc::now(), Duration::seconds(ttl_secs))
        .name(name)
        .email(email)
        .image(image);
    let token = sign(&claims, secret)?;
    println!("{}", token);
    Ok(())
}
