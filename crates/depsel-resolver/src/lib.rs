//! Selector-to-component resolution core.
//!
//! Each declared dependency becomes a [`selector::SelectorRecord`] that
//! resolves at most once through an [`id_resolver::IdentifierResolver`] into
//! a [`component::ComponentRecord`] owned by the session's
//! [`registry::ResolutionRegistry`]. Conflict resolution drives
//! [`session::ResolveSession::restart`] to move selectors onto a winner.

pub mod catalog;
pub mod component;
pub mod conflict;
pub mod id_resolver;
pub mod module;
pub mod registry;
pub mod selector;
pub mod session;
pub mod version;
