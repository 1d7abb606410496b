use crate::errors::{schema_invalid, ConfigError};
use crate::source::remote::RemoteDocProvider;
use crate::source::Source;
use nimbus_objstore::ObjectStore;
use std::sync::Arc;
use std::time::Duration;

pub const CLOUD_INSTANCE_VAR: &str = "GAE_INSTANCE";
pub const CLOUD_PROJECT_VAR: &str = "GCLOUD_PROJECT";

const BUCKET_SUFFIX: &str = "nimbus";

/// Hosting context, resolved once at startup and passed around explicitly.
#[derive(Clone, Debug)]
pub struct CloudEnv {
    pub on_cloud: bool,
    pub project_id: Option<String>,
    pub environment: String,
}

impl CloudEnv {
    /// Reads the managed-cloud instance flag and project id from the process
    /// environment. `environment` is the host's deployment environment name
    /// (e.g. "Production"), used for the default object key.
    pub fn detect(environment: impl Into<String>) -> Self {
        let project_id = std::env::var(CLOUD_PROJECT_VAR)
            .ok()
            .filter(|value| !value.is_empty());
        Self {
            on_cloud: std::env::var_os(CLOUD_INSTANCE_VAR).is_some(),
            project_id,
            environment: environment.into(),
        }
    }

    pub fn from_parts(
        on_cloud: bool,
        project_id: Option<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            on_cloud,
            project_id,
            environment: environment.into(),
        }
    }

    pub fn default_bucket(&self) -> Option<String> {
        self.project_id
            .as_ref()
            .map(|project| format!("{project}-{BUCKET_SUFFIX}"))
    }

    pub fn default_object(&self) -> String {
        format!("appsettings.{}.json", self.environment)
    }
}

#[derive(Clone, Debug, Default)]
pub struct RemoteOptions {
    pub bucket: Option<String>,
    pub object: Option<String>,
    pub poll_interval: Option<Duration>,
}

impl RemoteOptions {
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    pub fn with_object(mut self, object: impl Into<String>) -> Self {
        self.object = Some(object.into());
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }
}

/// Appends the remote document source to the host's source list.
///
/// Off-cloud this is a no-op and the list is left unchanged. On-cloud the
/// provider performs its initial load here, so a missing or malformed
/// document aborts registration and the host fails startup instead of
/// running without its required configuration.
pub async fn add_remote_source(
    sources: &mut Vec<Arc<dyn Source>>,
    store: Arc<dyn ObjectStore>,
    cloud: &CloudEnv,
    opts: RemoteOptions,
) -> Result<(), ConfigError> {
    if !cloud.on_cloud {
        return Ok(());
    }

    let bucket = match opts.bucket.or_else(|| cloud.default_bucket()) {
        Some(bucket) => bucket,
        None => {
            return Err(schema_invalid(
                "remote",
                "no bucket configured and no cloud project id detected",
            ))
        }
    };
    let object = opts.object.unwrap_or_else(|| cloud.default_object());

    let mut provider = RemoteDocProvider::connect(store, bucket, object).await?;
    if let Some(interval) = opts.poll_interval {
        provider = provider.with_poll_interval(interval);
    }
    sources.push(Arc::new(provider));
    Ok(())
}
