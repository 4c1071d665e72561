//! REST client SDK.
//!
//! Maps API resources to [`Repository`]s described by a
//! [`Mapping`](rcs_mapping::Mapping). Entities fetched through a repository
//! are registered clean in the client's
//! [`UnitOfWork`](rcs_diff::UnitOfWork); updates then send only the fields
//! that changed.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use rcs_auth::{MemoryBackend, ProvidedTokenGenerator, Token, TokenStorage};
//! use rcs_mapping::MappingDocument;
//! use rcs_sdk::{JsonSerializer, QueryParams, RestClientSdk, SdkConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let document = r#"
//!     id_prefix = "/v1"
//!
//!     [[classes]]
//!     key = "carts"
//!     path_root = "/v1/carts"
//!     attributes = [{ serialized_key = "@id", is_identifier = true }, { serialized_key = "status" }]
//! "#;
//! let mapping = MappingDocument::from_toml_str(document)?.into_mapping()?;
//! let storage = TokenStorage::new(
//!     Arc::new(ProvidedTokenGenerator::new(Token::new("access-token"))),
//!     Arc::new(MemoryBackend::new()),
//! );
//! let config = SdkConfig { path: "api.example.com".into(), ..Default::default() };
//! let sdk = RestClientSdk::new(config, Arc::new(mapping), Arc::new(storage), JsonSerializer);
//!
//! let carts = sdk.get_repository("carts")?;
//! let mut cart = carts.find("/v1/carts/1", &QueryParams::new()).await?;
//! cart.insert("status".into(), "payed".into());
//! carts.update(&cart, &QueryParams::new()).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod repository;
pub mod sdk;
pub mod serializer;
pub mod url;

pub use config::SdkConfig;
pub use error::{SdkError, SdkResult};
pub use repository::Repository;
pub use sdk::RestClientSdk;
pub use serializer::{JsonSerializer, Serializer};
pub use url::QueryParams;
