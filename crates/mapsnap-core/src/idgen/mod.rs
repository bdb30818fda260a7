//! Identifier-generator adapters.
//!
//! Some identifier strategies keep their state in helper tables. An adapter
//! recognizes one such strategy and describes its helper table, using only
//! the descriptor's own parameters.

mod hilo;
mod table_generator;

pub use hilo::MultipleHiLoPerTableAdapter;
pub use table_generator::TableGeneratorAdapter;

use tracing::warn;

use crate::metadata::IdGeneratorDescriptor;
use crate::model::Table;

/// Translates an identifier-generator strategy into a helper table.
pub trait IdGeneratorAdapter {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Returns whether this adapter understands the descriptor.
    fn supports(&self, descriptor: &IdGeneratorDescriptor) -> bool;

    /// Describes the helper table. Only called when
    /// [`supports`](Self::supports) returned `true`.
    fn snapshot(&self, descriptor: &IdGeneratorDescriptor) -> Table;
}

/// Built-in adapters in the order they are tried.
#[must_use]
pub fn default_adapters() -> Vec<Box<dyn IdGeneratorAdapter>> {
    vec![
        Box::new(MultipleHiLoPerTableAdapter),
        Box::new(TableGeneratorAdapter),
    ]
}

/// Reads a length parameter, falling back to `default` when it is not a
/// positive integer.
fn length_parameter(descriptor: &IdGeneratorDescriptor, key: &str, default: u32) -> u32 {
    let Some(raw) = descriptor.parameters.get(key) else {
        return default;
    };
    match raw.trim().parse::<u32>() {
        Ok(length) if length > 0 => length,
        _ => {
            warn!(parameter = key, value = %raw, default, "Ignoring invalid length");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::GeneratorStrategy;

    #[test]
    fn test_length_parameter() {
        let descriptor = IdGeneratorDescriptor::new(GeneratorStrategy::Table)
            .parameter("good", "64")
            .parameter("zero", "0")
            .parameter("junk", "wide");

        assert_eq!(length_parameter(&descriptor, "good", 255), 64);
        assert_eq!(length_parameter(&descriptor, "zero", 255), 255);
        assert_eq!(length_parameter(&descriptor, "junk", 255), 255);
        assert_eq!(length_parameter(&descriptor, "missing", 255), 255);
    }

    #[test]
    fn test_at_most_one_builtin_adapter_claims_each_strategy() {
        let strategies = [
            GeneratorStrategy::MultipleHiLoPerTable,
            GeneratorStrategy::Table,
            GeneratorStrategy::Sequence,
            GeneratorStrategy::Identity,
            GeneratorStrategy::Assigned,
            GeneratorStrategy::Custom("uuid2".into()),
        ];
        let adapters = default_adapters();
        for strategy in strategies {
            let descriptor = IdGeneratorDescriptor::new(strategy);
            let claims = adapters.iter().filter(|a| a.supports(&descriptor)).count();
            assert!(claims <= 1, "{descriptor:?} claimed {claims} times");
        }
    }
}
