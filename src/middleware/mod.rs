//! Request middleware.
//!
//! - [`auth`]: session token parsing and the [`auth::CurrentIdentity`]
//!   extractor
//! - [`role`]: role gates wrapping the protected route trees
//!
//! # Authentication flow
//!
//! 1. Client sends `Authorization: Bearer <session token>`
//! 2. The route's gate verifies the token and resolves the user through
//!    the auth provider
//! 3. The gate checks the role claim against the route's requirement
//! 4. On success the identity rides along in the request extensions and
//!    the handler reads it via `CurrentIdentity`

pub mod auth;
pub mod role;
