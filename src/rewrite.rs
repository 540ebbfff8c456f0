//! Qualifying union members of hoisted interfaces.
//!
//! A hoisted interface can still refer to types that stay inside the
//! wrapping namespace. Those references have to be written as
//! `<namespace>.<name>` to resolve from the module top level.

use serde::Deserialize;
use tracing::debug;

use crate::dts::{DtsInterface, DtsType};
use crate::error::{GenerateError, Result};
use crate::module::OutputModule;

/// Qualify `names` in the index signature union of `interface`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QualifyRule {
    pub interface: String,
    pub names: Vec<String>,
}

impl QualifyRule {
    pub fn new<I, S>(interface: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            interface: interface.into(),
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn defaults() -> Vec<QualifyRule> {
        vec![QualifyRule::new(
            "CompilerOptions",
            ["CompilerOptionsValue", "JsonSourceFile"],
        )]
    }

    fn missing(&self, reason: impl Into<String>) -> GenerateError {
        GenerateError::RewriteTargetMissing {
            interface: self.interface.clone(),
            reason: reason.into(),
        }
    }

    /// Rewrite one interface in place. Returns how many members changed.
    pub fn apply_to(&self, interface: &mut DtsInterface, namespace: &str) -> Result<usize> {
        let signature = interface
            .first_index_signature_mut()
            .ok_or_else(|| self.missing("interface has no index signature"))?;

        let DtsType::Union(members) = &mut signature.value_type else {
            return Err(self.missing("index signature value is not a union"));
        };

        let mut rewritten = 0;
        for member in members.iter_mut() {
            if let DtsType::Named { name, .. } = member {
                if self.names.iter().any(|n| n == &*name) {
                    *name = format!("{namespace}.{name}");
                    rewritten += 1;
                }
            }
        }
        Ok(rewritten)
    }
}

/// Apply every rule to the top-level interfaces of `module`.
pub fn apply_rules(module: &mut OutputModule, rules: &[QualifyRule], namespace: &str) -> Result<()> {
    for rule in rules {
        let interface = module
            .interface_mut(&rule.interface)
            .ok_or_else(|| rule.missing("interface is not hoisted to the module top level"))?;
        let rewritten = rule.apply_to(interface, namespace)?;
        debug!(interface = %rule.interface, rewritten, "qualified union members");
    }
    Ok(())
}
