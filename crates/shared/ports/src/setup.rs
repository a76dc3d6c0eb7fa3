use std::fmt;

/// Why the viewer is sent to account setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetupReason {
    /// No account identifier yet
    Unregistered,
    /// Registered, but locales, countries, arbitrators or the selected
    /// payment account are missing
    SettingsIncomplete,
}

impl fmt::Display for SetupReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupReason::Unregistered => f.write_str("unregistered"),
            SetupReason::SettingsIncomplete => f.write_str("settings incomplete"),
        }
    }
}

/// Port for the account-setup redirect
///
/// Invoking it is the terminal outcome of a blocked take or create.
pub trait AccountSetup: Send + Sync {
    fn open_account_setup(&self, reason: SetupReason);
}
