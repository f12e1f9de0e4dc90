//! Providers for the DCP credential-trust layer: credential profiles and generators, DID
//! resolution, revocation, trust registries and presentations.

pub mod caching_loader;
pub mod common_dto;
pub mod common_models;
pub mod credential_formatter;
pub mod credential_generator;
pub mod crypto;
pub mod did;
pub mod http_client;
pub mod key_algorithm;
pub mod key_storage;
pub mod presentation;
pub mod remote_entity_storage;
pub mod revocation;
pub mod storage;
pub mod token;
pub mod trust;
pub mod util;
