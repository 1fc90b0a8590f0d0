//! Schema command implementation.

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde_json::{Value, json};

use bluemix_provider::BluemixProvider;
use kubernetes_provider::KubernetesProvider;
use provider_core::Provider;

use crate::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    Bluemix,
    Kubernetes,
}

#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Provider to describe
    #[arg(value_enum)]
    pub provider: ProviderKind,
}

pub fn run(args: SchemaArgs) -> Result<()> {
    let document = match args.provider {
        ProviderKind::Bluemix => describe(&BluemixProvider),
        ProviderKind::Kubernetes => describe(&KubernetesProvider),
    };
    output::json_pretty(&document)
}

fn describe<P: Provider>(provider: &P) -> Value {
    json!({
        "provider": provider.name(),
        "schema": provider.schema(),
        "resources": provider.resource_schemas(),
        "data_sources": provider.data_source_schemas(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_kubernetes_namespace() {
        let document = describe(&KubernetesProvider);
        assert_eq!(document["provider"], "kubernetes");
        assert_eq!(document["schema"]["token"]["sensitive"], true);
        assert_eq!(
            document["resources"]["kubernetes_namespace"]["metadata"]["max_items"],
            1
        );
    }

    #[test]
    fn describes_bluemix_data_sources() {
        let document = describe(&BluemixProvider);
        assert_eq!(document["provider"], "bluemix");
        assert!(document["data_sources"]["bluemix_infrastructure_ssh_key"].is_object());
    }
}
