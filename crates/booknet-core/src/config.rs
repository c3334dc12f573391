/// Loads service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize`; field `database_url` maps to
/// `DATABASE_URL` and so on. Optional settings use `#[serde(default = ...)]`.
pub trait Config: Sized + serde::de::DeserializeOwned {
    /// Read the process environment.
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing or cannot be parsed.
    fn from_env() -> Self {
        Self::try_from_env().expect("failed to load config from environment")
    }

    fn try_from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Build from explicit key/value pairs (keys in `SCREAMING_SNAKE_CASE`).
    fn from_pairs<I>(pairs: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(pairs)
    }
}
