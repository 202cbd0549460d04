mod identity_cache_tests;
mod redis_client_tests;
