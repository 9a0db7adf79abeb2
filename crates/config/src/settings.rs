//! Ready-made settings records for cloud deployments.
//!
//! `Common` carries the storage identity shared by every deployment target
//! (Azure, GCP, AWS or a local file). `Base` embeds it and adds the HTTP
//! settings a hosted service needs, including the ports injected by the
//! hosting platform.

use serde::Deserialize;

use crate::record::{ConfigRecord, FieldDescriptor, RecordType, ValueKind};

/// Storage account details for AWS, GCP, Azure or local file storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Common {
    pub azure_storage_account: String,
    pub azure_storage_access_key: String,
    pub gcp_project: String,
    pub aws_enabled: bool,
}

impl ConfigRecord for Common {
    fn record_type() -> &'static RecordType {
        static RECORD: RecordType = RecordType::new(
            "Common",
            &[
                FieldDescriptor::leaf(
                    "AzureStorageAccount",
                    "azureStorageAccount",
                    ValueKind::String,
                ),
                FieldDescriptor::leaf(
                    "AzureStorageAccessKey",
                    "azureStorageAccessKey",
                    ValueKind::String,
                ),
                FieldDescriptor::leaf("GcpProject", "gcpProject", ValueKind::String),
                FieldDescriptor::leaf("AwsEnabled", "awsEnabled", ValueKind::Bool),
            ],
        );
        &RECORD
    }
}

/// Storage details plus the HTTP settings of a hosted service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Base {
    #[serde(flatten)]
    pub common: Common,
    /// Either `https` or `http`.
    pub scheme: String,
    /// Enables debug logging.
    pub debug: bool,
    /// Set by Azure App Service.
    pub http_platform_port: u16,
    pub https_platform_port: u16,
    /// Set by Amazon Web Services.
    pub port: u16,
}

impl ConfigRecord for Base {
    fn record_type() -> &'static RecordType {
        static RECORD: RecordType = RecordType::new(
            "Base",
            &[
                FieldDescriptor::embedded("Common", "common", Common::record_type),
                FieldDescriptor::leaf("Scheme", "scheme", ValueKind::String),
                FieldDescriptor::leaf("Debug", "debug", ValueKind::Bool),
                FieldDescriptor::leaf("HttpPlatformPort", "httpPlatformPort", ValueKind::Integer),
                FieldDescriptor::leaf(
                    "HttpsPlatformPort",
                    "httpsPlatformPort",
                    ValueKind::Integer,
                ),
                FieldDescriptor::leaf("Port", "port", ValueKind::Integer),
            ],
        );
        &RECORD
    }
}

impl Base {
    /// Port to listen on for HTTP: the platform port if set, otherwise the
    /// generic port. `None` when neither is configured.
    pub fn http_port(&self) -> Option<u16> {
        [self.http_platform_port, self.port]
            .into_iter()
            .find(|port| *port != 0)
    }

    /// Port to listen on for HTTPS, if the platform provides one.
    pub fn https_port(&self) -> Option<u16> {
        (self.https_platform_port != 0).then_some(self.https_platform_port)
    }
}
