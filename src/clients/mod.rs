//! External dependency capabilities
//!
//! The identity provider and the hosted database are opaque
//! collaborators behind narrow trait interfaces. Probes and tests
//! depend on the traits, never on the live implementations.

pub mod database;
pub mod identity;

pub use database::{DatabaseGateway, HealthQueryStats, RestDatabaseClient};
pub use identity::{DiscoveryDocument, IdentityProvider, OidcIdentityClient};
