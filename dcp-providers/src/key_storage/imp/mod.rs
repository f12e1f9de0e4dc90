pub mod internal;
pub mod provider;
