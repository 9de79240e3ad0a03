use rusqlite::{params, Connection};

use crate::error::PrmResult;
use crate::model::{Account, Id};

pub fn insert(conn: &Connection, account: &Account) -> PrmResult<()> {
    conn.execute(
        "INSERT INTO accounts (id, name, email) VALUES (?1, ?2, ?3)",
        params![account.id.to_db(), account.name, account.email],
    )?;
    Ok(())
}

pub fn find_by_id(conn: &Connection, id: Id<Account>) -> PrmResult<Option<Account>> {
    let mut stmt = conn.prepare("SELECT id, name, email FROM accounts WHERE id = ?1")?;
    let result = stmt.query_row(params![id.to_db()], |row| Ok(row_to_account(row)));

    match result {
        Ok(account) => Ok(Some(account?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn find_first(conn: &Connection) -> PrmResult<Option<Account>> {
    let mut stmt = conn.prepare("SELECT id, name, email FROM accounts ORDER BY rowid LIMIT 1")?;
    let result = stmt.query_row([], |row| Ok(row_to_account(row)));

    match result {
        Ok(account) => Ok(Some(account?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn row_to_account(row: &rusqlite::Row) -> PrmResult<Account> {
    let id_str: String = row.get(0)?;
    Ok(Account {
        id: Id::from_db(&id_str)?,
        name: row.get(1)?,
        email: row.get(2)?,
    })
}
