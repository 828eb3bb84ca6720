//! # Depot Authorization - Layer 3
//!
//! Decides, for a `(principal, directory, action)` triple, whether access is
//! allowed. Four authority sources overlap and are consulted in a fixed
//! order, first match wins:
//!
//! 1. global override (`access_all` role capability)
//! 2. public directories (read and write only, never delete)
//! 3. ownership
//! 4. role ceiling (a role without the capability is refused outright)
//! 5. nearest grant on the ancestor chain, which shadows every farther grant
//!
//! Decisions are three-way ([`AccessDecision`]) so callers can tell a
//! missing target from a refusal and see why a refusal happened.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod ancestry;
pub mod decision;
pub mod principal;
pub mod resolver;

pub use ancestry::AncestorWalk;
pub use decision::{AccessBasis, AccessDecision, DenialReason};
pub use principal::Principal;
pub use resolver::{AuthorizationResolver, PublicAccess};
