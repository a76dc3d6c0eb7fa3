use async_trait::async_trait;

use crate::error::WalletError;

/// Hash of a broadcast transaction
pub type TransactionId = String;

/// Port for the registration-fee side of the wallet
#[async_trait]
pub trait RegistrationWallet: Send + Sync {
    /// Pay the registration fee, committing to `bank_accounts`
    async fn pay_registration_fee(&self, bank_accounts: &str) -> Result<TransactionId, WalletError>;

    /// Address the fee was paid from, once one exists
    fn registration_address(&self) -> Option<String>;
}
