pub(crate) mod caching;
pub mod key_verification;

#[cfg(any(test, feature = "mock"))]
pub mod test_utilities;
