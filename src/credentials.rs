// Storage credential handling. Call sites only ever see a `Credential`;
// where it came from (prompt, environment) is the provider's business.

use anyhow::{Context, Result};
use dialoguer::Password;
use std::fmt;

/// Opaque storage token. Debug output never shows the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Trims surrounding whitespace and rejects empty tokens.
    pub fn new(token: &str) -> Result<Self> {
        let token = token.trim();
        if token.is_empty() {
            anyhow::bail!("Storage token is empty");
        }
        Ok(Credential(token.to_string()))
    }

    /// Value for the `Authorization` header of the storage API.
    pub fn header_value(&self) -> String {
        format!("OAuth {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

pub trait CredentialProvider {
    fn credential(&self) -> Result<Credential>;
}

/// Reads the token from an environment variable.
pub struct EnvCredentialProvider {
    var: String,
}

impl EnvCredentialProvider {
    pub fn new(var: impl Into<String>) -> Self {
        EnvCredentialProvider { var: var.into() }
    }
}

impl CredentialProvider for EnvCredentialProvider {
    fn credential(&self) -> Result<Credential> {
        let raw = std::env::var(&self.var)
            .with_context(|| format!("Environment variable {} is not set", self.var))?;
        Credential::new(&raw)
    }
}

/// Asks for the token on the terminal with hidden input.
pub struct PromptCredentialProvider {
    prompt: String,
}

impl PromptCredentialProvider {
    pub fn new(prompt: impl Into<String>) -> Self {
        PromptCredentialProvider {
            prompt: prompt.into(),
        }
    }
}

impl CredentialProvider for PromptCredentialProvider {
    fn credential(&self) -> Result<Credential> {
        let raw: String = Password::new()
            .with_prompt(&self.prompt)
            .interact()
            .context("Reading storage token")?;
        Credential::new(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_trimmed_and_wrapped() {
        let cred = Credential::new("  abc123\n").unwrap();
        assert_eq!(cred.header_value(), "OAuth abc123");
    }

    #[test]
    fn blank_token_is_rejected() {
        assert!(Credential::new("   ").is_err());
    }

    #[test]
    fn debug_hides_secret() {
        let cred = Credential::new("s3cret").unwrap();
        assert!(!format!("{:?}", cred).contains("s3cret"));
    }

    #[test]
    fn env_provider_reads_variable() {
        std::env::set_var("CATDISK_TEST_TOKEN_PRESENT", "tok");
        let cred = EnvCredentialProvider::new("CATDISK_TEST_TOKEN_PRESENT")
            .credential()
            .unwrap();
        assert_eq!(cred.header_value(), "OAuth tok");

        let missing = EnvCredentialProvider::new("CATDISK_TEST_TOKEN_ABSENT").credential();
        assert!(missing.is_err());
    }
}
