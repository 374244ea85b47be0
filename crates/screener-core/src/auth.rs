use screener_llm::{DEFAULT_HUB_ENDPOINT, HubAuth, HubClient, HubIdentity, LlmError};

use crate::vault::{EnvVaultProvider, Secret, VaultProvider};

/// Environment variable consulted when no token is passed explicitly.
pub const HF_TOKEN_ENV: &str = "HUGGINGFACEHUB_API_TOKEN";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(
        "HuggingFace token not found. Set HUGGINGFACEHUB_API_TOKEN or pass token explicitly."
    )]
    MissingToken,

    #[error(transparent)]
    Hub(#[from] LlmError),
}

/// Pick the explicit token if it is non-blank, otherwise the vault's `HUGGINGFACEHUB_API_TOKEN`.
#[must_use]
pub fn resolve_token(explicit: Option<&str>, vault: &dyn VaultProvider) -> Option<Secret> {
    explicit
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(Secret::new)
        .or_else(|| {
            vault
                .get_secret(HF_TOKEN_ENV)
                .map(|s| Secret::new(s.expose().trim()))
                .filter(|s| !s.expose().is_empty())
        })
}

/// Log in to the hub with the resolved token.
///
/// No request is made when neither source yields a token.
///
/// # Errors
///
/// Returns [`AuthError::MissingToken`] if no token resolves, or the client's error unchanged.
pub fn authenticate<C>(
    token: Option<&str>,
    vault: &dyn VaultProvider,
    client: &C,
) -> Result<HubIdentity, AuthError>
where
    C: HubAuth + ?Sized,
{
    let token = resolve_token(token, vault).ok_or(AuthError::MissingToken)?;
    login(client, &token)
}

/// [`authenticate`] against huggingface.co with the process environment as the fallback source.
///
/// # Errors
///
/// See [`authenticate`].
pub fn authenticate_huggingface(token: Option<&str>) -> Result<HubIdentity, AuthError> {
    let token = resolve_token(token, &EnvVaultProvider).ok_or(AuthError::MissingToken)?;
    let client = HubClient::new(DEFAULT_HUB_ENDPOINT)?;
    login(&client, &token)
}

fn login<C: HubAuth + ?Sized>(client: &C, token: &Secret) -> Result<HubIdentity, AuthError> {
    let identity = client.login(token.expose())?;
    tracing::info!(user = %identity.name, "authenticated with HuggingFace Hub");
    Ok(identity)
}
