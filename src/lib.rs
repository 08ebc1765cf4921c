//! # Edura API
//!
//! Backend of a learning management system: role management, course
//! publishing, enrollment, payment webhooks and progress tracking, built
//! with Axum and PostgreSQL on top of three external collaborators — an
//! authentication provider, a media host and a payment processor.
//!
//! ## Architecture
//!
//! Route handlers are deliberately thin. The structurally interesting
//! piece is the role gate chain in [`middleware`]: every protected route
//! tree is wrapped in a gate that resolves the caller through the auth
//! provider and enforces a role from a closed enumeration before the
//! handler runs.
//!
//! ```text
//! src/
//! ├── config/           # Environment-driven configuration, fail-fast
//! ├── integrations/     # Auth provider, media host, payment clients
//! ├── middleware/       # Session parsing and role gates
//! ├── modules/          # Feature modules
//! │   ├── users/       # Profile, enrollment, purchases, progress
//! │   ├── educator/    # Course publishing, earnings dashboard
//! │   ├── courses/     # Public catalogue
//! │   ├── admin/       # Platform administration
//! │   └── webhooks/    # Signed callbacks from external services
//! └── utils/            # Errors, token verification
//! ```
//!
//! Each feature module follows the same structure: `model.rs` (DTOs and
//! rows), `service.rs` (queries), `controller.rs` (handlers),
//! `router.rs` (routes and their gates).
//!
//! ## Roles
//!
//! | Role | Granted by | Access |
//! |------|-----------|--------|
//! | user | default | own profile, purchases, progress |
//! | educator | self-service request | course publishing, dashboard |
//! | admin | provider dashboard / admin API | platform administration |
//!
//! Role checks are exact: an admin calling an educator-only route gets a
//! 403, mirroring how the roles are provisioned upstream.
//!
//! ## External interfaces
//!
//! `POST /clerk` and `POST /stripe` receive signed webhooks and must see
//! the raw request body; both verify an HMAC-SHA256 signature before
//! parsing anything, and deduplicate deliveries by provider event id.

pub mod config;
pub mod docs;
pub mod integrations;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;
