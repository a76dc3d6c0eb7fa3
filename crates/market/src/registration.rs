//! Account registration
//!
//! Pays the registration fee, adopts the wallet's registration address as
//! the viewer's account id and persists the updated identity record.

use log::{debug, info};
use thiserror::Error;
use tradebook_core::{AccountId, ViewerIdentity};
use tradebook_ports::{Persistence, PersistenceError, RegistrationWallet, WalletError};

/// Key the identity record is written under
pub const IDENTITY_RECORD_KEY: &str = "identity";

#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("Insufficient funds for registration fee: need {required}, have {available}")]
    InsufficientFunds { required: String, available: String },

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Failed to encode identity record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl From<WalletError> for RegistrationError {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::InsufficientFunds {
                required,
                available,
            } => RegistrationError::InsufficientFunds {
                required,
                available,
            },
            WalletError::Failed(reason) => RegistrationError::Wallet(reason),
        }
    }
}

/// Register `identity` and return the updated identity
///
/// The fee commits to the viewer's bank accounts, serialised as JSON.
pub async fn register(
    identity: &ViewerIdentity,
    wallet: &dyn RegistrationWallet,
    persistence: &dyn Persistence,
) -> Result<ViewerIdentity, RegistrationError> {
    let bank_accounts = serde_json::to_string(&identity.bank_accounts)?;
    let tx_id = wallet.pay_registration_fee(&bank_accounts).await?;
    info!("Registration fee paid, tx id: {}", tx_id);

    let mut registered = identity.clone();
    match wallet.registration_address() {
        Some(address) => registered.account_id = Some(AccountId::new(address)),
        None => debug!("Wallet has no registration address yet"),
    }

    persistence.write(IDENTITY_RECORD_KEY, serde_json::to_value(&registered)?)?;
    Ok(registered)
}
