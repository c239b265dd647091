//! Common types for RotaMail

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for SMTP accounts
pub type AccountId = Uuid;

/// Unique identifier for delivery log rows
pub type AttemptId = Uuid;

/// Connection security for an SMTP account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encryption {
    /// Plaintext submission (trusted networks only)
    None,
    /// Opportunistic upgrade on port 587
    StartTls,
    /// Implicit TLS (smtps)
    Tls,
}

impl std::fmt::Display for Encryption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Encryption::None => write!(f, "none"),
            Encryption::StartTls => write!(f, "starttls"),
            Encryption::Tls => write!(f, "tls"),
        }
    }
}

impl std::str::FromStr for Encryption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" | "" => Ok(Encryption::None),
            "starttls" => Ok(Encryption::StartTls),
            "tls" | "ssl" => Ok(Encryption::Tls),
            _ => Err(format!("Invalid encryption mode: {}", s)),
        }
    }
}

/// Outcome of one delivery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptStatus {
    Sent,
    Failed,
}

impl std::fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptStatus::Sent => write!(f, "sent"),
            AttemptStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for AttemptStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sent" => Ok(AttemptStatus::Sent),
            "failed" => Ok(AttemptStatus::Failed),
            _ => Err(format!("Invalid attempt status: {}", s)),
        }
    }
}

/// Policy for choosing the next SMTP account in the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RotationMode {
    /// Cyclic by recipient position
    #[default]
    RoundRobin,
    /// Uniform random, independent per pick
    Random,
}

impl std::fmt::Display for RotationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RotationMode::RoundRobin => write!(f, "round-robin"),
            RotationMode::Random => write!(f, "random"),
        }
    }
}

impl std::str::FromStr for RotationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "round-robin" | "round" => Ok(RotationMode::RoundRobin),
            "random" => Ok(RotationMode::Random),
            _ => Err(format!("Invalid rotation mode: {}", s)),
        }
    }
}
