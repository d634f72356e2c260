//! Create-admin command - Bootstraps an admin account.
//!
//! Admin accounts have no REST provisioning surface; this command is the
//! only way to create one.

use std::sync::Arc;

use crate::cli::args::CreateAdminArgs;
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Database, Persistence};
use crate::services::{ProvisioningService, Registrar};

/// Execute the create-admin command
pub async fn execute(args: CreateAdminArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await;

    let uow = Arc::new(Persistence::new(db.get_connection()));
    let registrar = Registrar::new(uow);

    let user = registrar
        .create_admin(args.email, args.password, args.name)
        .await?;

    println!("Admin account created: {} <{}>", user.name, user.email);
    Ok(())
}
