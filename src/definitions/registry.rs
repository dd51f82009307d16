use super::catalog;
use crate::*;
use std::{collections::HashMap, sync::LazyLock};

/// Function catalog indexed by name and by location tag. Built once.
#[derive(Debug)]
pub struct FunctionRegistry {
    functions: Vec<FunctionDefinition>,
    by_name: HashMap<&'static str, usize>,
    by_location: HashMap<LocationTag, Vec<usize>>,
}

static FUNCTIONS: LazyLock<FunctionRegistry> =
    LazyLock::new(|| FunctionRegistry::new(catalog::builtin_functions()));

pub fn function_registry() -> &'static FunctionRegistry {
    &FUNCTIONS
}

/// Look up a function or operator by lower-case name.
pub fn function_definition(name: &str) -> Option<&'static FunctionDefinition> {
    FUNCTIONS.get(name)
}

impl FunctionRegistry {
    pub fn new(functions: Vec<FunctionDefinition>) -> Self {
        let mut by_name = HashMap::new();
        let mut by_location: HashMap<LocationTag, Vec<usize>> = HashMap::new();
        for (i, function) in functions.iter().enumerate() {
            by_name.insert(function.name, i);
            for location in &function.locations {
                by_location.entry(*location).or_default().push(i);
            }
        }
        debug!("Function registry built with {} entries", functions.len());
        Self {
            functions,
            by_name,
            by_location,
        }
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDefinition> {
        self.by_name.get(name).map(|&i| &self.functions[i])
    }

    pub fn all(&self) -> &[FunctionDefinition] {
        &self.functions
    }

    /// Functions usable at `location`, returning something compatible with
    /// `return_type` (`ParamType::Any` for no constraint), whose category is
    /// one of `categories`. Catalog order is preserved.
    pub fn get_functions_by_location(
        &self,
        location: LocationTag,
        return_type: ParamType,
        categories: &[FunctionCategory],
    ) -> Vec<&FunctionDefinition> {
        let Some(indices) = self.by_location.get(&location) else {
            return Vec::new();
        };
        indices
            .iter()
            .map(|&i| &self.functions[i])
            .filter(|f| categories.contains(&f.category))
            .filter(|f| {
                f.signatures
                    .iter()
                    .any(|s| s.possible_return().intersects(&return_type))
            })
            .collect()
    }
}
