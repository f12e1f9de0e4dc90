pub mod did;
pub mod holder;
pub mod issuer;
pub mod verifier;
