//! Pluggable identity-provider adapters for authenticating reverse proxies. Each adapter folds
//! a vendor's OAuth 2.0/OIDC dialect into one session contract the proxy core can trust.
//!
//! Adapters implement [`provider::Provider`]: validation collapses every upstream failure
//! into a fail-closed boolean, enrichment fills identity fields on a
//! [`session::SessionState`] and surfaces failures as [`Error`] values.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod protocol;
pub mod provider;
pub mod session;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use error::{Error, Result};
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
