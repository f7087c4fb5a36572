use crate::models::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;

//currency assumed when none is given
pub const DEFAULT_CURRENCY: &str = "HUF";

//where the money is held
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccountType {
    Cash,
    Bank,
    Other(String),
}

impl AccountType {
    //parses a type label, anything unrecognised is kept as Other
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "cash" => AccountType::Cash,
            "bank" => AccountType::Bank,
            "" => AccountType::Other("other".to_string()),
            _ => AccountType::Other(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AccountType::Cash => "cash",
            AccountType::Bank => "bank",
            AccountType::Other(label) => label,
        }
    }
}

impl Default for AccountType {
    fn default() -> Self {
        AccountType::Other("other".to_string())
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for AccountType {
    fn from(value: String) -> Self {
        AccountType::parse(&value)
    }
}

impl From<AccountType> for String {
    fn from(value: AccountType) -> Self {
        value.as_str().to_string()
    }
}

//a place money lives: a wallet, a bank account, ...
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    pub id: u64,
    pub name: String,
    pub account_type: AccountType,
    pub currency: String,
}

impl Account {
    //creates an account, name and currency must be non-empty
    pub fn new(
        id: u64,
        name: &str,
        account_type: AccountType,
        currency: &str,
    ) -> Result<Self, ModelError> {
        let name = name.trim();
        let currency = currency.trim();

        if name.is_empty() {
            return Err(ModelError::EmptyName);
        }
        if currency.is_empty() {
            return Err(ModelError::EmptyCurrency);
        }

        Ok(Account {
            id,
            name: name.to_string(),
            account_type,
            currency: currency.to_uppercase(),
        })
    }

    //renames the account
    pub fn rename(&mut self, name: &str) -> Result<(), ModelError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ModelError::EmptyName);
        }
        self.name = name.to_string();
        Ok(())
    }

    //changes the currency
    pub fn set_currency(&mut self, currency: &str) -> Result<(), ModelError> {
        let currency = currency.trim();
        if currency.is_empty() {
            return Err(ModelError::EmptyCurrency);
        }
        self.currency = currency.to_uppercase();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_account_types() {
        assert_eq!(AccountType::parse("cash"), AccountType::Cash);
        assert_eq!(AccountType::parse(" BANK "), AccountType::Bank);
        assert_eq!(
            AccountType::parse("broker"),
            AccountType::Other("broker".to_string())
        );
        assert_eq!(AccountType::parse(""), AccountType::default());
    }

    #[test]
    fn validates_name_and_currency() {
        let account = Account::new(1, " Wallet ", AccountType::Cash, "huf").unwrap();
        assert_eq!(account.name, "Wallet");
        assert_eq!(account.currency, "HUF");

        assert_eq!(
            Account::new(1, "  ", AccountType::Cash, "HUF"),
            Err(ModelError::EmptyName)
        );
        assert_eq!(
            Account::new(1, "Wallet", AccountType::Cash, ""),
            Err(ModelError::EmptyCurrency)
        );
    }

    #[test]
    fn rename_rejects_blank() {
        let mut account = Account::new(1, "Wallet", AccountType::Cash, "EUR").unwrap();
        assert!(account.rename("").is_err());
        account.rename("Purse").unwrap();
        assert_eq!(account.name, "Purse");
    }
}
