//! Use cases orchestrating domain entities through port interfaces

pub mod prepare_attempt;
pub mod resolve_account;

pub use prepare_attempt::PrepareAttemptUseCase;
pub use resolve_account::ResolveAccountUseCase;
