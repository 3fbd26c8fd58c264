// Client registry and per-client constants
pub mod clients;

// Domain-specific error types
pub mod errors;

// Canonical feature ordering shared by both model adapters
pub mod feature_registry;

// Port interfaces
pub mod ports;

// Core value objects
pub mod types;
