//! Technician and client operations for the Desk.

use super::Desk;
use crate::{
    display::{Clients, Technicians},
    error::Result,
    models::{Client, Technician},
    params::{CreateClient, CreateTechnician},
};

impl Desk {
    /// Registers a technician.
    pub async fn add_technician(&self, params: &CreateTechnician) -> Result<Technician> {
        params.validate()?;
        let name = params.name.trim().to_string();
        let email = params.email.trim().to_string();

        let tech = self
            .with_db(move |db| db.create_technician(&name, &email))
            .await?;
        log::info!("Registered technician {} <{}>", tech.id, tech.email);
        Ok(tech)
    }

    /// Lists technicians by name.
    pub async fn list_technicians(&self) -> Result<Technicians> {
        self.with_db(|db| db.list_technicians().map(Technicians))
            .await
    }

    /// Registers a client.
    pub async fn add_client(&self, params: &CreateClient) -> Result<Client> {
        params.validate()?;
        let name = params.name.trim().to_string();
        let default_workflow = params.default_workflow.clone();

        let client = self
            .with_db(move |db| db.create_client(&name, default_workflow.as_deref()))
            .await?;
        log::info!("Registered client {} ({})", client.id, client.name);
        Ok(client)
    }

    /// Lists clients by name.
    pub async fn list_clients(&self) -> Result<Clients> {
        self.with_db(|db| db.list_clients().map(Clients)).await
    }
}
