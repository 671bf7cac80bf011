use serde::Deserialize;

/// Body of the login and register forms. Missing fields read as empty.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}
