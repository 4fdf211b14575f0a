//! Symbol and label bookkeeping for the single-pass parser
//!
//! Variables must be bound before they are read. Labels may be jumped to
//! before they are declared, so references are only checked once the whole
//! program has been consumed.

use std::collections::{BTreeMap, HashMap, HashSet};

use log::debug;

use crate::errors::{SourceSpan, TeenyError, TeenyResult};

/// Names bound by `LET` or `INPUT` so far. Every symbol has the same
/// implicit numeric type, so only membership is tracked.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    names: HashSet<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a name. Returns `true` the first time the name is seen;
    /// rebinding an existing name is allowed.
    pub fn declare(&mut self, name: &str) -> bool {
        let inserted = self.names.insert(name.to_string());
        if inserted {
            debug!("declared variable '{}'", name);
        }
        inserted
    }

    /// Check whether a name has been bound
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }
}

/// Declared labels and the labels targeted by `GOTO`
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    /// Label name to the span of its declaration
    declared: HashMap<String, SourceSpan>,
    /// Label name to the span of its first `GOTO`, ordered by name
    referenced: BTreeMap<String, SourceSpan>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a `LABEL`. Declaring the same name twice is an error.
    pub fn declare(&mut self, name: &str, span: SourceSpan) -> TeenyResult<()> {
        if self.declared.contains_key(name) {
            return Err(TeenyError::semantic(
                format!("label already exists: {}", name),
                span,
            ));
        }
        debug!("declared label '{}'", name);
        self.declared.insert(name.to_string(), span);
        Ok(())
    }

    /// Record a `GOTO` target. Validated later by [`LabelTable::check_references`].
    pub fn reference(&mut self, name: &str, span: SourceSpan) {
        self.referenced.entry(name.to_string()).or_insert(span);
    }

    /// Referenced labels that were never declared, sorted by name
    pub fn unresolved(&self) -> Vec<(&str, SourceSpan)> {
        self.referenced
            .iter()
            .filter(|(name, _)| !self.declared.contains_key(name.as_str()))
            .map(|(name, span)| (name.as_str(), *span))
            .collect()
    }

    /// Fail if any `GOTO` targets a label that was never declared
    pub fn check_references(&self) -> TeenyResult<()> {
        let missing = self.unresolved();
        let Some((_, span)) = missing.first() else {
            return Ok(());
        };

        let names: Vec<&str> = missing.iter().map(|(name, _)| *name).collect();
        Err(TeenyError::semantic(
            format!("attempting to GOTO undeclared label: {}", names.join(", ")),
            *span,
        ))
    }
}
