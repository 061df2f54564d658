//! Plans: declare aspects for a ledger and replay operations through a proxy
//!
//! ```toml
//! [ledger]
//! owner = "alice"
//! balance = 100
//!
//! [[method]]
//! name = "withdraw"
//! aspects = [{ kind = "trace" }]
//!
//! [[property]]
//! name = "balance"
//! aspects = [{ kind = "range_guard", params = { min = 0 } }]
//!
//! [[op]]
//! op = "call"
//! member = "withdraw"
//! args = [50]
//! ```

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use weave_aspects::create_default_registry;
use weave_core::{Arguments, PipelineConfig, Result, WeaveConfig};
use weave_proxy::{
    AspectContainer, DeclarativeResolver, Declarations, MemberDeclaration, Proxy, TypeDeclaration,
};

use crate::ledger::Ledger;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Plan {
    /// Initial ledger state.
    #[serde(default)]
    pub ledger: Ledger,
    /// Overrides the pipeline section of the loaded config.
    #[serde(default)]
    pub pipeline: Option<PipelineConfig>,
    #[serde(default, rename = "method")]
    pub methods: Vec<MemberDeclaration>,
    #[serde(default, rename = "property")]
    pub properties: Vec<MemberDeclaration>,
    #[serde(default, rename = "op")]
    pub operations: Vec<Operation>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Operation {
    Call {
        member: String,
        #[serde(default)]
        args: Vec<Value>,
    },
    Get {
        property: String,
    },
    Set {
        property: String,
        value: Value,
    },
    Delete {
        property: String,
    },
    Exists {
        property: String,
    },
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Call { member, args } => {
                let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                write!(f, "{}({})", member, args.join(", "))
            }
            Operation::Get { property } => write!(f, "get {}", property),
            Operation::Set { property, value } => write!(f, "set {} = {}", property, value),
            Operation::Delete { property } => write!(f, "delete {}", property),
            Operation::Exists { property } => write!(f, "exists {}", property),
        }
    }
}

/// Outcome of one operation. Failures are recorded, not fatal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpReport {
    pub op: String,
    pub result: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OpReport {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanReport {
    pub operations: Vec<OpReport>,
    /// Ledger state after the last operation.
    pub ledger: Ledger,
}

impl Plan {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn declarations(&self) -> Declarations {
        let mut declarations = Declarations::new();
        declarations.insert_type(
            Ledger::TYPE_NAME,
            TypeDeclaration {
                methods: self.methods.clone(),
                properties: self.properties.clone(),
            },
        );
        declarations
    }
}

/// Build a proxied ledger from `plan` and run its operations in order.
///
/// Declaration errors (unknown aspect kinds) abort the run; errors from
/// individual operations are captured in their report.
pub fn run_plan(plan: &Plan, config: &WeaveConfig) -> Result<PlanReport> {
    let registry = Arc::new(create_default_registry());
    let resolver = Arc::new(DeclarativeResolver::new(plan.declarations(), registry));
    let pipeline = plan.pipeline.clone().unwrap_or_else(|| config.pipeline.clone());
    let container = AspectContainer::with_config(resolver, pipeline);

    let mut proxy = container.proxy(plan.ledger.clone())?;
    info!(operations = plan.operations.len(), "running plan");

    let operations = plan
        .operations
        .iter()
        .map(|op| {
            let outcome = apply(&mut proxy, op);
            match outcome {
                Ok(result) => OpReport {
                    op: op.to_string(),
                    result,
                    error: None,
                },
                Err(e) => {
                    warn!(op = %op, "operation failed: {}", e);
                    OpReport {
                        op: op.to_string(),
                        result: Value::Null,
                        error: Some(e.to_string()),
                    }
                }
            }
        })
        .collect();

    Ok(PlanReport {
        operations,
        ledger: proxy.into_inner(),
    })
}

fn apply(proxy: &mut Proxy<Ledger>, op: &Operation) -> Result<Value> {
    match op {
        Operation::Call { member, args } => {
            proxy.call(member, Arguments::positional(args.iter().cloned()))
        }
        Operation::Get { property } => proxy.get(property),
        Operation::Set { property, value } => proxy.set(property, value.clone()),
        Operation::Delete { property } => proxy.delete(property),
        Operation::Exists { property } => proxy.exists(property).map(Value::Bool),
    }
}
