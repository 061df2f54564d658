//! Ledger - a small account type used by plans and the CLI

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use weave_core::{Arguments, Error, Result, Target};

/// Account with an owner and an integer balance.
///
/// Methods: `deposit(amount)`, `withdraw(amount)`, `balance()`,
/// `statement()`. Properties: `balance` (integer, not deletable) and
/// `owner` (string, deletable).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub balance: i64,
    /// Number of real method calls that reached the ledger.
    #[serde(default)]
    pub calls: u64,
}

impl Ledger {
    pub const TYPE_NAME: &'static str = "Ledger";

    pub fn new(owner: impl Into<String>, balance: i64) -> Self {
        Self {
            owner: Some(owner.into()),
            balance,
            calls: 0,
        }
    }

    fn amount(args: &Arguments) -> Result<i64> {
        let value = args
            .get_or_named(0, "amount")
            .ok_or_else(|| Error::target("missing argument: amount"))?;
        let amount = value
            .as_i64()
            .ok_or_else(|| Error::target(format!("amount must be an integer, got {}", value)))?;
        if amount < 0 {
            return Err(Error::target("amount must not be negative"));
        }
        Ok(amount)
    }
}

impl Target for Ledger {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn call(&mut self, member: &str, args: &Arguments) -> Result<Value> {
        self.calls += 1;
        match member {
            "deposit" => {
                let amount = Self::amount(args)?;
                self.balance = self
                    .balance
                    .checked_add(amount)
                    .ok_or_else(|| Error::target("balance overflow"))?;
                Ok(json!(self.balance))
            }
            "withdraw" => {
                let amount = Self::amount(args)?;
                if amount > self.balance {
                    return Err(Error::target(format!(
                        "insufficient funds: balance {}, requested {}",
                        self.balance, amount
                    )));
                }
                self.balance -= amount;
                Ok(json!(self.balance))
            }
            "balance" => Ok(json!(self.balance)),
            "statement" => Ok(json!({
                "owner": self.owner,
                "balance": self.balance,
            })),
            _ => Err(Error::unknown_member(Self::TYPE_NAME, member)),
        }
    }

    fn get_property(&self, name: &str) -> Option<Value> {
        match name {
            "balance" => Some(json!(self.balance)),
            "owner" => self.owner.clone().map(Value::String),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "balance" => {
                self.balance = value
                    .as_i64()
                    .ok_or_else(|| Error::target(format!("balance must be an integer, got {}", value)))?;
                Ok(())
            }
            "owner" => match value {
                Value::String(s) => {
                    self.owner = Some(s);
                    Ok(())
                }
                Value::Null => {
                    self.owner = None;
                    Ok(())
                }
                other => Err(Error::target(format!("owner must be a string, got {}", other))),
            },
            _ => Err(Error::unknown_property(Self::TYPE_NAME, name)),
        }
    }

    fn delete_property(&mut self, name: &str) -> Result<()> {
        match name {
            "owner" => {
                self.owner = None;
                Ok(())
            }
            "balance" => Err(Error::target("balance cannot be deleted")),
            _ => Err(Error::unknown_property(Self::TYPE_NAME, name)),
        }
    }
}
