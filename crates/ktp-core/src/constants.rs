/// Well-known key under which the resource catalog is stored.
pub const DEFAULT_CATALOG_KEY: &str = "uploadedFiles";

/// Role assumed when the login step did not record one.
pub const DEFAULT_USER_ROLE: &str = "Frontend Developer";

/// Prefix of every handle URL minted by the handle broker.
pub const HANDLE_URL_PREFIX: &str = "blob:ktp/";

/// Default directory for the local key-value store.
pub const DEFAULT_DATA_DIR: &str = ".ktp";

/// Placeholder for an absent context segment in a scoped catalog key.
pub const MISSING_SEGMENT: &str = "-";
