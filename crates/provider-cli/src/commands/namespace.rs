//! Kubernetes namespace commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use serde_json::{Map, Value, json};

use kubernetes_provider::{KubeClient, KubernetesProvider, NAMESPACE, NamespaceResource};
use provider_core::{Provider, ResourceData, schema};

use super::{ensure_found, parse_key_value};
use crate::output;

#[derive(Args, Debug)]
pub struct NamespaceCommand {
    #[command(flatten)]
    pub cluster: ClusterArgs,

    #[command(subcommand)]
    pub command: NamespaceSubcommand,
}

/// API server connection; falls back to KUBE_HOST / KUBE_TOKEN.
#[derive(Args, Debug)]
pub struct ClusterArgs {
    /// Kubernetes API server address
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Bearer token for the API server
    #[arg(long, global = true)]
    pub token: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum NamespaceSubcommand {
    /// Create a namespace
    Create(MetadataArgs),

    /// Show a namespace
    Get(NameArgs),

    /// Replace a namespace's labels and annotations
    Update(UpdateArgs),

    /// Delete a namespace and wait until it is gone
    Delete(NameArgs),
}

#[derive(Args, Debug)]
pub struct MetadataArgs {
    /// Namespace name
    #[arg(long, conflicts_with = "generate_name")]
    pub name: Option<String>,

    /// Prefix for a server-generated name
    #[arg(long)]
    pub generate_name: Option<String>,

    /// Label to set (repeatable)
    #[arg(long = "label", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub labels: Vec<(String, String)>,

    /// Annotation to set (repeatable)
    #[arg(long = "annotation", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub annotations: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Name of the namespace to update
    pub namespace: String,

    /// Label to set (repeatable)
    #[arg(long = "label", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub labels: Vec<(String, String)>,

    /// Annotation to set (repeatable)
    #[arg(long = "annotation", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub annotations: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct NameArgs {
    /// Namespace name
    pub namespace: String,
}

fn string_map(pairs: Vec<(String, String)>) -> Value {
    Value::Object(
        pairs
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect::<Map<String, Value>>(),
    )
}

impl MetadataArgs {
    /// Resource data holding a single metadata block.
    fn into_data(self) -> ResourceData {
        let mut block = Map::new();
        if let Some(name) = self.name {
            block.insert("name".to_string(), Value::String(name));
        }
        if let Some(prefix) = self.generate_name {
            block.insert("generate_name".to_string(), Value::String(prefix));
        }
        if !self.labels.is_empty() {
            block.insert("labels".to_string(), string_map(self.labels));
        }
        if !self.annotations.is_empty() {
            block.insert("annotations".to_string(), string_map(self.annotations));
        }
        ResourceData::new().with("metadata", json!([block]))
    }
}

/// Validate user input before any request is made.
fn validated(mut data: ResourceData) -> Result<ResourceData> {
    schema::prepare(&NamespaceResource::resource_schema(), &mut data)?;
    Ok(data)
}

async fn connect(cluster: ClusterArgs) -> Result<KubeClient> {
    let mut config = ResourceData::new();
    if let Some(host) = cluster.host {
        config.set("host", host);
    }
    if let Some(token) = cluster.token {
        config.set("token", token);
    }

    KubernetesProvider
        .prepare_and_configure(config)
        .await
        .context("Failed to configure kubernetes provider")
}

pub async fn handle(cmd: NamespaceCommand) -> Result<()> {
    match cmd.command {
        NamespaceSubcommand::Create(args) => {
            let mut data = validated(args.into_data())?;
            let client = connect(cmd.cluster).await?;
            let resource = KubernetesProvider.resource(&client, NAMESPACE)?;
            resource
                .create(&mut data)
                .await
                .context("Failed to create namespace")?;
            output::resource(&data)
        }
        NamespaceSubcommand::Get(args) => {
            let client = connect(cmd.cluster).await?;
            let resource = KubernetesProvider.resource(&client, NAMESPACE)?;
            let data = resource
                .import(&args.namespace)
                .await
                .context("Failed to read namespace")?;
            ensure_found(&data, "Namespace", &args.namespace)?;
            output::resource(&data)
        }
        NamespaceSubcommand::Update(args) => {
            let metadata = MetadataArgs {
                name: Some(args.namespace.clone()),
                generate_name: None,
                labels: args.labels,
                annotations: args.annotations,
            };
            let mut data = validated(metadata.into_data())?;
            data.set_id(&args.namespace);

            let client = connect(cmd.cluster).await?;
            let resource = KubernetesProvider.resource(&client, NAMESPACE)?;
            resource
                .update(&mut data)
                .await
                .context("Failed to update namespace")?;
            output::resource(&data)
        }
        NamespaceSubcommand::Delete(args) => {
            let client = connect(cmd.cluster).await?;
            let resource = KubernetesProvider.resource(&client, NAMESPACE)?;
            let mut data = ResourceData::with_id(&args.namespace);

            eprintln!("{}", "Waiting for namespace deletion...".dimmed());
            resource
                .delete(&mut data)
                .await
                .context("Failed to delete namespace")?;
            output::success(&format!("Deleted namespace {}", args.namespace));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_args_build_a_single_block() {
        let data = MetadataArgs {
            name: Some("team-a".to_string()),
            generate_name: None,
            labels: vec![("app".to_string(), "web".to_string())],
            annotations: Vec::new(),
        }
        .into_data();

        let data = validated(data).unwrap();
        let block = data.get_block("metadata").unwrap();
        assert_eq!(block["name"], "team-a");
        assert_eq!(block["labels"], json!({"app": "web"}));
        assert!(block.get("annotations").is_none());
    }

    #[test]
    fn invalid_name_is_rejected_before_connecting() {
        let data = MetadataArgs {
            name: Some("Team_A".to_string()),
            generate_name: None,
            labels: Vec::new(),
            annotations: Vec::new(),
        }
        .into_data();

        let err = validated(data).unwrap_err();
        assert!(err.to_string().contains("metadata.0.name"));
    }
}
