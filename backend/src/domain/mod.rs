//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed catalogue and account entities used by the
//! API and persistence layers, together with the ports adapters implement.
//! Types validate on construction so later layers never see raw input.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - catalogue — companies, fuel types, engines, cars and performance.
//! - catalogue_import — CSV row import into the catalogue.
//! - User (alias to `user::User`) — registered account.

pub mod auth;
pub mod catalogue;
pub mod catalogue_import;
pub mod error;
pub mod field_parser;
pub mod password;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_accounts;

pub use self::auth::{LoginCredentials, LoginValidationError, PASSWORD_MIN, Registration};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::trace_id::TraceId;
pub use self::user::{EmailAddress, User, UserId, UserValidationError, Username};
pub use self::user_accounts::UserAccountService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use car_catalogue::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
