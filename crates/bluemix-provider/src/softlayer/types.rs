//! SoftLayer datatypes used by the resources.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Service names.
pub const SSH_KEY_SERVICE: &str = "SoftLayer_Security_Ssh_Key";
pub const ACCOUNT_SERVICE: &str = "SoftLayer_Account";
pub const VIRTUAL_GUEST_SERVICE: &str = "SoftLayer_Virtual_Guest";

/// `SoftLayer_Security_Ssh_Key`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SshKey {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_date: Option<DateTime<FixedOffset>>,
}

/// A datacenter reference, e.g. `{"name": "dal09"}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
}

/// A reference to another object by id.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IdRef {
    pub id: i64,
}

/// `SoftLayer_Virtual_Guest`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualGuest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cpus: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_memory: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_billing_flag: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_disk_flag: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_system_reference_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datacenter: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_keys: Option<Vec<IdRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_backend_ip_address: Option<String>,
}

/// Error body returned by the SoftLayer REST API.
#[derive(Debug, Deserialize)]
pub struct SoftLayerErrorResponse {
    pub error: Option<String>,
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ssh_key_template_omits_unset_fields() {
        let key = SshKey {
            label: Some("deploy".to_string()),
            key: Some("ssh-rsa AAAA".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&key).unwrap(),
            json!({"label": "deploy", "key": "ssh-rsa AAAA"})
        );
    }

    #[test]
    fn ssh_key_parses_create_date() {
        let key: SshKey = serde_json::from_value(json!({
            "id": 7,
            "label": "deploy",
            "createDate": "2017-03-01T10:00:00-06:00"
        }))
        .unwrap();
        assert_eq!(key.id, Some(7));
        assert_eq!(
            key.create_date.unwrap().to_rfc3339(),
            "2017-03-01T10:00:00-06:00"
        );
    }

    #[test]
    fn virtual_guest_uses_camel_case() {
        let guest = VirtualGuest {
            hostname: Some("web1".to_string()),
            start_cpus: Some(2),
            hourly_billing_flag: Some(true),
            datacenter: Some(Location {
                name: "dal09".to_string(),
            }),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&guest).unwrap(),
            json!({
                "hostname": "web1",
                "startCpus": 2,
                "hourlyBillingFlag": true,
                "datacenter": {"name": "dal09"}
            })
        );
    }
}
