use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Catalog storage backend types
///
/// Defined in core because configuration selects it before any store exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogBackend {
    /// One file per key under the data directory; survives restarts.
    Local,
    /// Process-local map; gone when the process exits.
    Memory,
}

impl FromStr for CatalogBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(CatalogBackend::Local),
            "memory" => Ok(CatalogBackend::Memory),
            _ => Err(anyhow::anyhow!("Invalid catalog backend: {}", s)),
        }
    }
}

impl Display for CatalogBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            CatalogBackend::Local => write!(f, "local"),
            CatalogBackend::Memory => write!(f, "memory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("LOCAL".parse::<CatalogBackend>().unwrap(), CatalogBackend::Local);
        assert_eq!(" memory ".parse::<CatalogBackend>().unwrap(), CatalogBackend::Memory);
    }

    #[test]
    fn rejects_unknown_backend() {
        assert!("s3".parse::<CatalogBackend>().is_err());
    }

    #[test]
    fn display_matches_parse() {
        for backend in [CatalogBackend::Local, CatalogBackend::Memory] {
            assert_eq!(backend.to_string().parse::<CatalogBackend>().unwrap(), backend);
        }
    }
}
