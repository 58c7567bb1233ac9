pub mod auth_service;
pub mod staking_service;
pub mod token_service;
pub mod wallet_service;
