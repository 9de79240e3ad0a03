use std::fs;

use rusqlite::Connection;

use crate::config::Config;
use crate::db::{account_repo, schema};
use crate::error::{PrmError, PrmResult};
use crate::model::{Account, Contact, Id, ProjectionSettings};

/// Everything a command needs: an initialized connection, the projection
/// settings and, once `init` has run, the account.
pub struct CliContext {
    pub conn: Connection,
    pub account: Option<Account>,
    pub settings: ProjectionSettings,
}

impl CliContext {
    pub fn open(config: &Config) -> PrmResult<Self> {
        if let Some(dir) = config.database_path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let conn = Connection::open(&config.database_path)?;
        schema::initialize(&conn)?;
        let account = account_repo::find_first(&conn)?;
        tracing::debug!(
            path = %config.database_path.display(),
            has_account = account.is_some(),
            "database opened"
        );

        Ok(Self {
            conn,
            account,
            settings: config.projection(),
        })
    }

    pub fn account(&self) -> PrmResult<&Account> {
        self.account.as_ref().ok_or_else(|| {
            PrmError::Other("No account yet; run `prm-contacts init --name <NAME>` first".into())
        })
    }

    /// Parses a contact id given on the command line.
    pub fn contact_id(&self, raw: &str) -> PrmResult<Id<Contact>> {
        Id::parse(raw.trim())
            .map_err(|e| PrmError::Other(format!("Invalid contact id '{}': {}", raw, e)))
    }
}
