use std::collections::HashMap;

use super::types::{VariableReport, VariableUsageRecord};

/// Usage statistics keyed by `property:raw value`.
///
/// Reports keep the order in which their key was first recorded.
#[derive(Debug, Default)]
pub struct UsageLedger {
    index: HashMap<String, usize>,
    reports: Vec<(String, VariableReport)>,
}

pub fn ledger_key(property: &str, raw_value: &str) -> String {
    format!("{}:{}", property, raw_value)
}

impl UsageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        property: &str,
        raw_value: &str,
        variable_name: &str,
        source_path: &str,
        source_line: usize,
    ) {
        let key = ledger_key(property, raw_value);
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                self.index.insert(key.clone(), self.reports.len());
                self.reports.push((
                    key,
                    VariableReport {
                        variable_name: variable_name.to_string(),
                        raw_value: raw_value.to_string(),
                        usage_count: 0,
                        usages: Vec::new(),
                    },
                ));
                self.reports.len() - 1
            }
        };

        let report = &mut self.reports[slot].1;
        report.usages.push(VariableUsageRecord {
            source_path: source_path.to_string(),
            source_line,
            property: property.to_string(),
            raw_value: raw_value.to_string(),
        });
        report.usage_count += 1;
    }

    /// All reports with their keys.
    pub fn report(&self) -> impl Iterator<Item = (&str, &VariableReport)> {
        self.reports.iter().map(|(key, report)| (key.as_str(), report))
    }

    pub fn get(&self, property: &str, raw_value: &str) -> Option<&VariableReport> {
        self.index
            .get(&ledger_key(property, raw_value))
            .map(|&slot| &self.reports[slot].1)
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}
