//! kubernetes-provider - Kubernetes namespaces over the core v1 REST API.
//!
//! The provider is configured with an API server address and an optional
//! bearer token, and manages the `kubernetes_namespace` resource. Deleting a
//! namespace waits until the server has finished terminating it.

pub mod client;
pub mod metadata;
pub mod namespace;
pub mod provider;
pub mod types;
pub mod wait;

pub use client::KubeClient;
pub use namespace::{DELETE_TIMEOUT, NamespaceResource};
pub use provider::{KubernetesProvider, NAMESPACE};
pub use wait::{Observed, StateWaiter};
