// ── File-backed session ──
//
// The CLI runs one command per process, so the session must outlive it.
// The file holds `{token, user}` as JSON; the in-memory copy is what
// actions read.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use bodega_core::model::User;
use bodega_core::{Session, SessionError, SessionProvider, StoredSession};
use secrecy::SecretString;
use tracing::{debug, info};

#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    current: ArcSwapOption<Session>,
}

impl FileSessionStore {
    /// Open the store at `path`, loading any session already saved there.
    ///
    /// A missing file means logged out.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let current = match std::fs::read_to_string(&path) {
            Ok(raw) => {
                let stored: StoredSession = serde_json::from_str(&raw)?;
                debug!(path = %path.display(), "session loaded");
                Some(Arc::new(Session::from(stored)))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(source) => {
                return Err(SessionError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        Ok(Self {
            path,
            current: ArcSwapOption::new(current),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    /// Sibling file the next session is staged in before the rename.
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// The token is never readable by other users, not even between
    /// create and chmod: the staging file is born 0600 and renamed over the
    /// old session in one step.
    fn write(&self, stored: &StoredSession) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }
        let body = serde_json::to_vec_pretty(stored)?;
        let staging = self.staging_path();

        // A leftover from a crashed write keeps its old mode; start fresh.
        if let Err(e) = std::fs::remove_file(&staging) {
            if e.kind() != std::io::ErrorKind::NotFound {
                return Err(self.io_err(e));
            }
        }
        let staged = private_file(&staging).and_then(|mut file| {
            file.write_all(&body)?;
            file.sync_all()
        });
        if let Err(e) = staged.and_then(|()| std::fs::rename(&staging, &self.path)) {
            let _ = std::fs::remove_file(&staging);
            return Err(self.io_err(e));
        }
        Ok(())
    }
}

fn private_file(path: &Path) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}

impl SessionProvider for FileSessionStore {
    fn token(&self) -> Option<SecretString> {
        self.current.load_full().map(|s| s.token.clone())
    }

    fn user(&self) -> Option<User> {
        self.current.load_full().map(|s| s.user.clone())
    }

    fn set(&self, token: SecretString, user: User) -> Result<(), SessionError> {
        let session = Session { token, user };
        self.write(&StoredSession::from(&session))?;
        info!(user = %session.user.email, path = %self.path.display(), "session saved");
        self.current.store(Some(Arc::new(session)));
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.current.store(None);
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "session removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_err(e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bodega_core::model::{DocumentType, Role};
    use secrecy::ExposeSecret;

    use super::*;

    fn user() -> User {
        User {
            id: "u1".into(),
            name: "Ana".into(),
            last_name: "Pérez".into(),
            id_number: "1".into(),
            type_document: DocumentType::Cc,
            phone: "300".into(),
            email: "ana@example.com".into(),
            role: Role::Seller,
            status: true,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn session_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions").join("default.json");

        let store = FileSessionStore::open(&path).unwrap();
        assert!(!store.is_authenticated());
        store.set(SecretString::from("jwt".to_owned()), user()).unwrap();

        let reopened = FileSessionStore::open(&path).unwrap();
        assert_eq!(reopened.token().unwrap().expose_secret(), "jwt");
        assert_eq!(reopened.user().unwrap().role, Role::Seller);

        reopened.clear().unwrap();
        assert!(!path.exists());
        assert!(reopened.clear().is_ok());
        assert!(!FileSessionStore::open(&path).unwrap().is_authenticated());
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        let store = FileSessionStore::open(&path).unwrap();
        store.set(SecretString::from("jwt".to_owned()), user()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn rewriting_a_loose_session_file_tightens_it() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(&path, "{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
        // Stale staging file from an interrupted write, world-readable.
        let staging = dir.path().join("s.json.tmp");
        std::fs::write(&staging, "old").unwrap();
        std::fs::set_permissions(&staging, std::fs::Permissions::from_mode(0o644)).unwrap();

        let store = FileSessionStore {
            path: path.clone(),
            current: ArcSwapOption::empty(),
        };
        store.set(SecretString::from("jwt".to_owned()), user()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(!staging.exists());
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("s.json")]);
        let reopened = FileSessionStore::open(&path).unwrap();
        assert_eq!(reopened.token().unwrap().expose_secret(), "jwt");
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            FileSessionStore::open(&path),
            Err(SessionError::Corrupt(_))
        ));
    }
}
