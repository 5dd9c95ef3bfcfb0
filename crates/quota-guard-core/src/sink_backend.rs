use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Usage sink backend types
///
/// Defined in core because configuration selects it; the sinks crate builds
/// the matching implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkBackend {
    /// Durable upsert store (DynamoDB table)
    DynamoDb,
    /// Flat tabular file rewritten on each report
    Csv,
    /// Process-local store, nothing survives the run
    Memory,
}

impl FromStr for SinkBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dynamodb" | "ddb" => Ok(SinkBackend::DynamoDb),
            "csv" => Ok(SinkBackend::Csv),
            "memory" => Ok(SinkBackend::Memory),
            _ => Err(anyhow::anyhow!("Invalid usage sink: {}", s)),
        }
    }
}

impl Display for SinkBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SinkBackend::DynamoDb => write!(f, "dynamodb"),
            SinkBackend::Csv => write!(f, "csv"),
            SinkBackend::Memory => write!(f, "memory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_backends() {
        assert_eq!("dynamodb".parse::<SinkBackend>().unwrap(), SinkBackend::DynamoDb);
        assert_eq!("DDB".parse::<SinkBackend>().unwrap(), SinkBackend::DynamoDb);
        assert_eq!(" csv ".parse::<SinkBackend>().unwrap(), SinkBackend::Csv);
        assert_eq!("Memory".parse::<SinkBackend>().unwrap(), SinkBackend::Memory);
    }

    #[test]
    fn rejects_unknown_backend() {
        let err = "postgres".parse::<SinkBackend>().unwrap_err();
        assert!(err.to_string().contains("Invalid usage sink"));
    }

    #[test]
    fn display_round_trips() {
        for backend in [SinkBackend::DynamoDb, SinkBackend::Csv, SinkBackend::Memory] {
            assert_eq!(backend.to_string().parse::<SinkBackend>().unwrap(), backend);
        }
    }
}
