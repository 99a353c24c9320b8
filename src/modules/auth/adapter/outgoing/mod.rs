pub mod account_store_postgres;
pub mod cached_account_store;
pub mod jwt;
pub mod random_code_generator;
pub mod sea_orm_entity;
pub mod security;
pub mod token_cache_redis;

pub use account_store_postgres::AccountStorePostgres;
pub use cached_account_store::CachedAccountStore;
pub use random_code_generator::RandomCodeGenerator;
pub use token_cache_redis::RedisTokenCache;
