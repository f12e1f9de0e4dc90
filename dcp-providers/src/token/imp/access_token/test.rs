use ct_codecs::{Base64UrlSafeNoPadding, Encoder};
use serde_json::{json, Value};
use time::Duration;

use super::{create_access_token, parse_access_token, parse_scopes};
use crate::{
    token::error::TokenError,
    util::test_utilities::TestIdentity,
};

fn unsigned_token(payload: Value) -> String {
    let header = Base64UrlSafeNoPadding::encode_to_string(r#"{"alg":"ES256"}"#).unwrap();
    let payload = Base64UrlSafeNoPadding::encode_to_string(payload.to_string()).unwrap();
    format!("{header}.{payload}.")
}

#[test]
fn test_parse_scopes_shapes() {
    assert_eq!(
        parse_scopes(Some(&json!(["org.eclipse.dspace.dcp.vc.type:MembershipCredential:read"]))),
        vec!["org.eclipse.dspace.dcp.vc.type:MembershipCredential:read"]
    );
    assert_eq!(
        parse_scopes(Some(&json!("a:MembershipCredential:read  b:DataProcessorCredential:read"))),
        vec!["a:MembershipCredential:read", "b:DataProcessorCredential:read"]
    );
    assert!(parse_scopes(None).is_empty());
    assert!(parse_scopes(Some(&Value::Null)).is_empty());
    assert!(parse_scopes(Some(&json!({ "scope": "x" }))).is_empty());
    assert!(parse_scopes(Some(&json!(42))).is_empty());
    assert_eq!(parse_scopes(Some(&json!(["x", 1, " "]))), vec!["x"]);
}

#[test]
fn test_parse_access_token() {
    let token = unsigned_token(json!({
        "iss": "did:web:holder.example",
        "sub": "did:web:verifier.example",
        "scope": "x:MembershipCredential:read"
    }));

    let access_token = parse_access_token(&token).unwrap();
    assert_eq!(access_token.issuer, "did:web:holder.example");
    assert_eq!(access_token.subject.as_deref(), Some("did:web:verifier.example"));
    assert_eq!(access_token.scopes, vec!["x:MembershipCredential:read"]);
}

#[test]
fn test_parse_access_token_requires_issuer() {
    for payload in [json!({ "scope": "x" }), json!({ "iss": "  " })] {
        assert!(matches!(
            parse_access_token(&unsigned_token(payload)),
            Err(TokenError::MissingClaim("iss"))
        ));
    }
}

#[test]
fn test_parse_access_token_malformed() {
    assert!(matches!(
        parse_access_token("not-a-jwt"),
        Err(TokenError::Malformed(_))
    ));
}

#[tokio::test]
async fn test_create_access_token() {
    let holder = TestIdentity::new("did:web:holder.example");

    let token = create_access_token(
        holder.did.as_str(),
        "did:web:verifier.example",
        holder.did.as_str(),
        &["x:MembershipCredential:read".to_owned()],
        Duration::minutes(5),
        holder.auth_fn(),
    )
    .await
    .unwrap();

    let access_token = parse_access_token(&token).unwrap();
    assert_eq!(access_token.issuer, holder.did.as_str());
    assert_eq!(access_token.scopes, vec!["x:MembershipCredential:read"]);
}
