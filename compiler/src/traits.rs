use crate::{
    builder::RegistryEntry,
    diagnostics::Diagnostics,
    error::SchemaError,
    resolver::TypeResolver,
};

/// Every named schema type turns into exactly one registry entry.
pub trait Synthesize {
    fn synthesize(
        &self,
        resolver: &TypeResolver<'_>,
        diags: &mut Diagnostics,
    ) -> Result<RegistryEntry, SchemaError>;
}
