use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteScoreError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("site already exists: {0}")]
    DuplicateName(String),

    #[error("site not found: {0}")]
    NotFound(String),

    #[error("unknown option '{option}' for criterion '{criterion}'")]
    UnknownOption { criterion: String, option: String },

    #[error("unknown criterion: {0}")]
    UnknownCriterion(String),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("geocoding unavailable for '{0}'; enter coordinates manually")]
    GeocodeUnavailable(String),

    #[error("invalid catalog: {0}")]
    CatalogInvalid(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("registry mismatch: {0}")]
    RegistryMismatch(String),

    #[error("logging setup failed: {0}")]
    Telemetry(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, SiteScoreError>;
