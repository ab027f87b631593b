use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cloud provider owning a kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum CloudResourceProvider {
    #[default]
    Unspecified = 0,
    Test = 1,
    Atlas = 2,
    Aws = 3,
    Azure = 4,
    Confluent = 5,
    DigitalOcean = 6,
    Gcp = 7,
    Kubernetes = 8,
    Snowflake = 9,
}

impl CloudResourceProvider {
    pub const ALL: [CloudResourceProvider; 9] = [
        Self::Test,
        Self::Atlas,
        Self::Aws,
        Self::Azure,
        Self::Confluent,
        Self::DigitalOcean,
        Self::Gcp,
        Self::Kubernetes,
        Self::Snowflake,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unspecified => "unspecified",
            Self::Test => "test",
            Self::Atlas => "atlas",
            Self::Aws => "aws",
            Self::Azure => "azure",
            Self::Confluent => "confluent",
            Self::DigitalOcean => "digital_ocean",
            Self::Gcp => "gcp",
            Self::Kubernetes => "kubernetes",
            Self::Snowflake => "snowflake",
        }
    }

    /// API group used in manifest `apiVersion` values
    pub fn api_group(self) -> String {
        format!("{}.project-planton.org", self.as_str().replace('_', ""))
    }
}

impl fmt::Display for CloudResourceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CloudResourceProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().replace('_', "") == normalized)
            .ok_or_else(|| format!("unknown provider: {}", s))
    }
}

/// Kubernetes kinds are either cluster add-ons or application workloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum KubernetesResourceType {
    #[default]
    Unspecified = 0,
    Addon = 1,
    Workload = 2,
}

impl KubernetesResourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unspecified => "unspecified",
            Self::Addon => "addon",
            Self::Workload => "workload",
        }
    }
}

impl fmt::Display for KubernetesResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!("aws".parse::<CloudResourceProvider>(), Ok(CloudResourceProvider::Aws));
        assert_eq!("GCP".parse::<CloudResourceProvider>(), Ok(CloudResourceProvider::Gcp));
        assert_eq!(
            "digital-ocean".parse::<CloudResourceProvider>(),
            Ok(CloudResourceProvider::DigitalOcean)
        );
        assert!("oracle".parse::<CloudResourceProvider>().is_err());
    }

    #[test]
    fn test_api_group() {
        assert_eq!(CloudResourceProvider::Aws.api_group(), "aws.project-planton.org");
        assert_eq!(
            CloudResourceProvider::DigitalOcean.api_group(),
            "digitalocean.project-planton.org"
        );
    }
}
