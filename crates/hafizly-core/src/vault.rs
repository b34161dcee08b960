//! Passcode storage and the private-access gate
//!
//! The only user data kept on the device is a single passcode string,
//! stored in a file under the data directory. The gate over private
//! links is a plain boolean: unlocked by string equality, locked again
//! when the private screen goes away. There is no session timeout,
//! lockout, or rate limiting.

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from passcode storage
#[derive(Error, Debug)]
pub enum VaultError {
    /// Setting a passcode requires both fields
    #[error("Password and confirmation required")]
    MissingConfirmation,

    /// Passcode and confirmation differ
    #[error("Passwords do not match")]
    Mismatch,

    #[error("Failed to read passcode file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write passcode file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Storage for the single private-links passcode
pub struct PasscodeVault {
    path: PathBuf,
}

impl PasscodeVault {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Whether a passcode has been stored
    pub fn is_set(&self) -> bool {
        matches!(self.load(), Ok(Some(_)))
    }

    /// Read the stored passcode, `None` when none has been set
    pub fn load(&self) -> Result<Option<String>, VaultError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let passcode = contents.trim_end_matches('\n').to_string();
                if passcode.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(passcode))
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(VaultError::Read {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    /// Validate and store a new passcode
    ///
    /// Both fields must be non-empty and equal; any previous passcode is
    /// replaced.
    pub fn store(&self, passcode: &str, confirm: &str) -> Result<(), VaultError> {
        if passcode.is_empty() || confirm.is_empty() {
            return Err(VaultError::MissingConfirmation);
        }
        if passcode != confirm {
            return Err(VaultError::Mismatch);
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| VaultError::Write {
                path: self.path.clone(),
                source: e,
            })?;
        }
        fs::write(&self.path, passcode).map_err(|e| VaultError::Write {
            path: self.path.clone(),
            source: e,
        })
    }
}

/// Gate state for the private screen
///
/// Lives only as long as the screen is mounted; callers re-lock when the
/// screen goes away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessGate {
    #[default]
    Locked,
    Unlocked,
}

impl AccessGate {
    pub fn is_unlocked(self) -> bool {
        self == AccessGate::Unlocked
    }

    /// Try to unlock with the given input
    ///
    /// With no passcode stored the gate opens freely. Returns whether the
    /// attempt succeeded; a wrong passcode leaves the gate locked.
    pub fn unlock(&mut self, vault: &PasscodeVault, input: &str) -> Result<bool, VaultError> {
        match vault.load()? {
            None => {
                *self = AccessGate::Unlocked;
                Ok(true)
            }
            Some(stored) if stored == input => {
                *self = AccessGate::Unlocked;
                Ok(true)
            }
            Some(_) => Ok(false),
        }
    }

    pub fn lock(&mut self) {
        *self = AccessGate::Locked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_vault(temp_dir: &TempDir) -> PasscodeVault {
        PasscodeVault::new(temp_dir.path().join("passcode"))
    }

    #[test]
    fn test_unset_initially() {
        let temp_dir = TempDir::new().unwrap();
        let vault = test_vault(&temp_dir);

        assert!(!vault.is_set());
        assert!(vault.load().unwrap().is_none());
    }

    #[test]
    fn test_store_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let vault = test_vault(&temp_dir);

        vault.store("hunter2", "hunter2").unwrap();
        assert!(vault.is_set());
        assert_eq!(vault.load().unwrap().as_deref(), Some("hunter2"));
    }

    #[test]
    fn test_store_replaces_previous() {
        let temp_dir = TempDir::new().unwrap();
        let vault = test_vault(&temp_dir);

        vault.store("first", "first").unwrap();
        vault.store("second", "second").unwrap();
        assert_eq!(vault.load().unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_store_requires_both_fields() {
        let temp_dir = TempDir::new().unwrap();
        let vault = test_vault(&temp_dir);

        assert!(matches!(
            vault.store("", ""),
            Err(VaultError::MissingConfirmation)
        ));
        assert!(matches!(
            vault.store("secret", ""),
            Err(VaultError::MissingConfirmation)
        ));
        assert!(!vault.is_set());
    }

    #[test]
    fn test_store_rejects_mismatch() {
        let temp_dir = TempDir::new().unwrap();
        let vault = test_vault(&temp_dir);

        assert!(matches!(
            vault.store("secret", "secrte"),
            Err(VaultError::Mismatch)
        ));
        assert!(!vault.is_set());
    }

    #[test]
    fn test_gate_unlocks_with_correct_passcode() {
        let temp_dir = TempDir::new().unwrap();
        let vault = test_vault(&temp_dir);
        vault.store("secret", "secret").unwrap();

        let mut gate = AccessGate::default();
        assert!(!gate.is_unlocked());

        assert!(gate.unlock(&vault, "secret").unwrap());
        assert!(gate.is_unlocked());
    }

    #[test]
    fn test_gate_stays_locked_on_wrong_passcode() {
        let temp_dir = TempDir::new().unwrap();
        let vault = test_vault(&temp_dir);
        vault.store("secret", "secret").unwrap();

        let mut gate = AccessGate::default();
        assert!(!gate.unlock(&vault, "wrong").unwrap());
        assert!(!gate.is_unlocked());
    }

    #[test]
    fn test_gate_opens_freely_without_passcode() {
        let temp_dir = TempDir::new().unwrap();
        let vault = test_vault(&temp_dir);

        let mut gate = AccessGate::default();
        assert!(gate.unlock(&vault, "").unwrap());
        assert!(gate.is_unlocked());
    }

    #[test]
    fn test_relock() {
        let temp_dir = TempDir::new().unwrap();
        let vault = test_vault(&temp_dir);
        vault.store("secret", "secret").unwrap();

        let mut gate = AccessGate::default();
        gate.unlock(&vault, "secret").unwrap();
        assert!(gate.is_unlocked());

        // Leaving the screen locks it again; the passcode is required anew
        gate.lock();
        assert!(!gate.is_unlocked());
        assert!(!gate.unlock(&vault, "wrong").unwrap());
    }
}
