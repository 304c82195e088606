//! Technician and client records.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};

use crate::{
    error::{DatabaseResultExt, DeskError, Result},
    models::{Client, Technician},
};

const INSERT_TECHNICIAN_SQL: &str =
    "INSERT INTO technicians (name, email, created_at) VALUES (?1, ?2, ?3)";
const CHECK_TECHNICIAN_EMAIL_SQL: &str =
    "SELECT EXISTS(SELECT 1 FROM technicians WHERE email = ?1)";
const SELECT_TECHNICIAN_SQL: &str = "SELECT id, name, email FROM technicians WHERE id = ?1";
const SELECT_TECHNICIANS_SQL: &str = "SELECT id, name, email FROM technicians ORDER BY name, id";

const INSERT_CLIENT_SQL: &str =
    "INSERT INTO clients (name, default_workflow, created_at) VALUES (?1, ?2, ?3)";
const SELECT_CLIENT_SQL: &str = "SELECT id, name, default_workflow FROM clients WHERE id = ?1";
const SELECT_CLIENTS_SQL: &str = "SELECT id, name, default_workflow FROM clients ORDER BY name, id";

fn build_technician_from_row(row: &rusqlite::Row) -> rusqlite::Result<Technician> {
    Ok(Technician {
        id: row.get::<_, i64>(0)? as u64,
        name: row.get(1)?,
        email: row.get(2)?,
    })
}

fn build_client_from_row(row: &rusqlite::Row) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get::<_, i64>(0)? as u64,
        name: row.get(1)?,
        default_workflow: row.get(2)?,
    })
}

impl super::Database {
    /// Registers a technician. Emails are unique.
    pub fn create_technician(&mut self, name: &str, email: &str) -> Result<Technician> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let taken: bool = tx
            .query_row(CHECK_TECHNICIAN_EMAIL_SQL, params![email], |row| row.get(0))
            .db_context("Failed to check technician email")?;

        if taken {
            return Err(DeskError::invalid_input("email")
                .with_reason(format!("A technician with email '{email}' already exists")));
        }

        tx.execute(
            INSERT_TECHNICIAN_SQL,
            params![name, email, Timestamp::now().to_string()],
        )
        .db_context("Failed to insert technician")?;

        let id = tx.last_insert_rowid() as u64;
        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Technician {
            id,
            name: name.to_string(),
            email: email.to_string(),
        })
    }

    /// Retrieves a technician by ID.
    pub fn get_technician(&self, id: u64) -> Result<Option<Technician>> {
        self.connection
            .query_row(SELECT_TECHNICIAN_SQL, params![id as i64], build_technician_from_row)
            .optional()
            .db_context("Failed to query technician")
    }

    /// Lists technicians by name.
    pub fn list_technicians(&self) -> Result<Vec<Technician>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_TECHNICIANS_SQL)
            .db_context("Failed to prepare query")?;

        let technicians = stmt
            .query_map([], build_technician_from_row)
            .db_context("Failed to query technicians")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch technicians")?;

        Ok(technicians)
    }

    /// Registers a client.
    pub fn create_client(&mut self, name: &str, default_workflow: Option<&str>) -> Result<Client> {
        self.connection
            .execute(
                INSERT_CLIENT_SQL,
                params![name, default_workflow, Timestamp::now().to_string()],
            )
            .db_context("Failed to insert client")?;

        Ok(Client {
            id: self.connection.last_insert_rowid() as u64,
            name: name.to_string(),
            default_workflow: default_workflow.map(String::from),
        })
    }

    /// Retrieves a client by ID.
    pub fn get_client(&self, id: u64) -> Result<Option<Client>> {
        self.connection
            .query_row(SELECT_CLIENT_SQL, params![id as i64], build_client_from_row)
            .optional()
            .db_context("Failed to query client")
    }

    /// Lists clients by name.
    pub fn list_clients(&self) -> Result<Vec<Client>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_CLIENTS_SQL)
            .db_context("Failed to prepare query")?;

        let clients = stmt
            .query_map([], build_client_from_row)
            .db_context("Failed to query clients")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch clients")?;

        Ok(clients)
    }
}
