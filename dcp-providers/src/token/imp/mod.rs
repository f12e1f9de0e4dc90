pub mod access_token;
pub mod self_issued;
