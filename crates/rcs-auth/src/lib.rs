//! OAuth token lifecycle for the REST client SDK.
//!
//! A [`TokenStorage`] pairs a [`TokenGenerator`] (how tokens are obtained)
//! with a [`TokenBackend`] (where the current token lives). The HTTP layer
//! asks the storage for the access token before each request and asks it to
//! refresh when the API answers `401`.
//!
//! # Generators
//!
//! - [`PasswordGenerator`]: resource owner password grant
//! - [`ClientCredentialsGenerator`]: client credentials grant
//! - [`AuthorizationCodeGenerator`]: authorization code grant
//! - [`ProvidedTokenGenerator`]: a token obtained elsewhere

pub mod error;
pub mod generator;
pub mod storage;
pub mod token;

pub use error::{AuthError, AuthResult};
pub use generator::{
    AuthorizationCodeGenerator, ClientCredentialsGenerator, GeneratorConfig, GrantParams,
    PasswordGenerator, ProvidedTokenGenerator, RefreshFn, RefreshFuture, TokenGenerator,
};
pub use storage::{MemoryBackend, TokenBackend, TokenStorage, DEFAULT_ACCESS_TOKEN_KEY};
pub use token::Token;
