//! Packet and Acknowledgement Types
//!
//! Minimal view of an ICS-04 packet and the acknowledgement envelope the host
//! chain writes back for it. The callbacks only use the packet for log
//! correlation; the acknowledgement decides success or failure.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// An outbound packet whose acknowledgement is being processed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    pub sequence: u64,
    pub source_port: String,
    pub source_channel: String,
    pub destination_port: String,
    pub destination_channel: String,
    /// Opaque packet payload
    #[serde(with = "hex_bytes")]
    pub data: Vec<u8>,
    pub timeout_timestamp: u64,
}

impl Packet {
    pub fn new(
        source_port: impl Into<String>,
        source_channel: impl Into<String>,
        sequence: u64,
    ) -> Self {
        Self {
            sequence,
            source_port: source_port.into(),
            source_channel: source_channel.into(),
            ..Default::default()
        }
    }

    /// `port/channel/sequence`, unique per outbound packet
    pub fn correlation_id(&self) -> String {
        format!("{}/{}/{}", self.source_port, self.source_channel, self.sequence)
    }

    /// Hex SHA-256 of the packet payload
    pub fn data_hash(&self) -> String {
        hex::encode(Sha256::digest(&self.data))
    }
}

/// Result payload of a successful acknowledgement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcknowledgementResult {
    #[serde(with = "hex_bytes")]
    pub result: Vec<u8>,
}

impl AcknowledgementResult {
    pub fn new(result: impl Into<Vec<u8>>) -> Self {
        Self {
            result: result.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AcknowledgementError {
    #[error("malformed acknowledgement: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid base64 in acknowledgement result: {0}")]
    InvalidResult(#[from] base64::DecodeError),
}

/// Acknowledgement written by the host chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acknowledgement {
    Result(AcknowledgementResult),
    Error(String),
}

/// JSON wire shape: `{"result":"<base64>"}` or `{"error":"<message>"}`
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum AckEnvelope {
    Result(String),
    Error(String),
}

impl Acknowledgement {
    /// Decode a JSON acknowledgement envelope
    pub fn from_json(bytes: &[u8]) -> Result<Self, AcknowledgementError> {
        match serde_json::from_slice::<AckEnvelope>(bytes)? {
            AckEnvelope::Result(encoded) => Ok(Self::Result(AcknowledgementResult {
                result: STANDARD.decode(encoded)?,
            })),
            AckEnvelope::Error(message) => Ok(Self::Error(message)),
        }
    }

    /// Encode as a JSON acknowledgement envelope
    pub fn to_json(&self) -> Vec<u8> {
        let envelope = match self {
            Self::Result(ack) => AckEnvelope::Result(STANDARD.encode(&ack.result)),
            Self::Error(message) => AckEnvelope::Error(message.clone()),
        };
        // Serializing a single-field enum of strings cannot fail
        serde_json::to_vec(&envelope).unwrap_or_default()
    }

    /// The result payload, `None` when the host reported an error
    pub fn success_result(&self) -> Option<&AcknowledgementResult> {
        match self {
            Self::Result(ack) => Some(ack),
            Self::Error(_) => None,
        }
    }

    /// Decode raw acknowledgement bytes straight to the value callbacks expect.
    ///
    /// Undecodable bytes are treated the same as an error acknowledgement.
    pub fn result_from_bytes(bytes: &[u8]) -> Option<AcknowledgementResult> {
        match Self::from_json(bytes) {
            Ok(Self::Result(ack)) => Some(ack),
            Ok(Self::Error(message)) => {
                tracing::warn!(target: "stakeibc::ack", error = %message, "host chain returned error acknowledgement");
                None
            }
            Err(e) => {
                tracing::warn!(target: "stakeibc::ack", error = %e, "could not decode acknowledgement envelope");
                None
            }
        }
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}
