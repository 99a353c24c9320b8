pub mod account_store;
pub mod password_hasher;
pub mod token_cache;
pub mod token_provider;
pub mod verification_code_generator;

pub use account_store::{AccountStore, AccountStoreError};
pub use password_hasher::{HashError, PasswordHasher};
pub use token_cache::{CachedRefreshToken, TokenCache, TokenCacheError};
pub use token_provider::{AccessClaims, TokenError, TokenProvider};
pub use verification_code_generator::VerificationCodeGenerator;
