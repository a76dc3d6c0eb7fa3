use serde::{Deserialize, Serialize};
use std::fmt;

use super::Offer;
use crate::values::CurrencyCode;

/// Public key the viewer uses on the message network
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Account identifier obtained by registering
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Payment method tag carried by offers and accounts
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BankAccountType {
    Sepa,
    Wire,
    International,
    OkPay,
    NetTeller,
    PerfectMoney,
    Other(String),
}

impl fmt::Display for BankAccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankAccountType::Sepa => f.write_str("SEPA"),
            BankAccountType::Wire => f.write_str("WIRE"),
            BankAccountType::International => f.write_str("INTERNATIONAL"),
            BankAccountType::OkPay => f.write_str("OK_PAY"),
            BankAccountType::NetTeller => f.write_str("NET_TELLER"),
            BankAccountType::PerfectMoney => f.write_str("PERFECT_MONEY"),
            BankAccountType::Other(name) => f.write_str(name),
        }
    }
}

/// Country of a bank account
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Country {
    /// ISO 3166 alpha-2 code
    pub code: String,
    pub name: String,
}

impl Country {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// A payment account the viewer can trade with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentAccount {
    pub id: String,
    pub currency: CurrencyCode,
    pub account_type: BankAccountType,
    pub country: Country,
}

/// Who is looking at the order book
///
/// Passed by value into every ownership and registration decision; nothing
/// in the marketplace core reads identity from ambient state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerIdentity {
    pub public_key: IdentityKey,
    /// None until the viewer has registered
    pub account_id: Option<AccountId>,
    /// Account currently selected for trading
    pub selected_account: Option<PaymentAccount>,
    /// All accounts the viewer has set up
    pub bank_accounts: Vec<PaymentAccount>,
}

impl ViewerIdentity {
    /// An unregistered viewer with no accounts
    pub fn new(public_key: IdentityKey) -> Self {
        Self {
            public_key,
            account_id: None,
            selected_account: None,
            bank_accounts: Vec::new(),
        }
    }

    pub fn with_account_id(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// Add an account and select it
    pub fn with_selected_account(mut self, account: PaymentAccount) -> Self {
        if !self.bank_accounts.contains(&account) {
            self.bank_accounts.push(account.clone());
        }
        self.selected_account = Some(account);
        self
    }

    pub fn is_registered(&self) -> bool {
        self.account_id.is_some()
    }

    /// Currency every query and reload is scoped to
    ///
    /// The selected account's currency, or `default` when no account is selected.
    pub fn currency_scope(&self, default: &CurrencyCode) -> CurrencyCode {
        self.selected_account
            .as_ref()
            .map(|account| account.currency.clone())
            .unwrap_or_else(|| default.clone())
    }

    /// True when the viewer published `offer`
    pub fn owns(&self, offer: &Offer) -> bool {
        offer.owner() == &self.public_key
    }
}
