//! Management operations produced from diff records

use std::fmt;

use mgmt_model::{Model, ModelValue, PathAddress};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

static ROOT: PathAddress = PathAddress::root();

/// An operation request for an executor. Operations must be applied in the
/// order they were produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Add {
        address: PathAddress,
        params: Model,
    },
    Remove {
        address: PathAddress,
    },
    WriteAttribute {
        address: PathAddress,
        name: String,
        value: ModelValue,
    },
    /// Steps applied as one unit; addressed at the root, each step carries
    /// its own address
    Composite {
        steps: Vec<Operation>,
    },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::WriteAttribute { .. } => "write-attribute",
            Self::Composite { .. } => "composite",
        }
    }

    pub fn address(&self) -> &PathAddress {
        match self {
            Self::Add { address, .. }
            | Self::Remove { address }
            | Self::WriteAttribute { address, .. } => address,
            Self::Composite { .. } => &ROOT,
        }
    }

    /// Request document form:
    /// `{"operation": "add", "address": [{"subsystem": "logging"}], ...}`.
    pub fn to_value(&self) -> Value {
        let address: Vec<Value> = self
            .address()
            .iter()
            .map(|e| {
                let mut element = Map::new();
                element.insert(e.key.clone(), Value::from(e.value.as_str()));
                Value::Object(element)
            })
            .collect();

        let mut doc = Map::new();
        doc.insert("operation".into(), Value::from(self.name()));
        doc.insert("address".into(), Value::Array(address));
        match self {
            Self::Add { params, .. } => {
                for (name, value) in params {
                    doc.insert(name.clone(), value.clone());
                }
            }
            Self::Remove { .. } => {}
            Self::WriteAttribute { name, value, .. } => {
                doc.insert("name".into(), Value::from(name.as_str()));
                doc.insert("value".into(), value.clone());
            }
            Self::Composite { steps } => {
                doc.insert(
                    "steps".into(),
                    Value::Array(steps.iter().map(Operation::to_value).collect()),
                );
            }
        }
        Value::Object(doc)
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

struct CliValue<'a>(&'a Value);

impl fmt::Display for CliValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Null => write!(f, "undefined"),
            other => write!(f, "{}", other),
        }
    }
}

/// Management CLI form, e.g. `/a=1/b=2:add(one=1,two="x")`.
impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let address = self.address();
        if !address.is_empty() {
            write!(f, "{}", address)?;
        }
        write!(f, ":{}", self.name())?;
        match self {
            Self::Add { params, .. } => {
                if params.is_empty() {
                    return Ok(());
                }
                write!(f, "(")?;
                for (i, (name, value)) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}={}", name, CliValue(value))?;
                }
                write!(f, ")")
            }
            Self::Remove { .. } => Ok(()),
            Self::WriteAttribute { name, value, .. } => {
                write!(f, "(name={},value={})", name, CliValue(value))
            }
            Self::Composite { steps } => {
                write!(f, "(steps=[")?;
                for (i, step) in steps.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", step)?;
                }
                write!(f, "])")
            }
        }
    }
}
