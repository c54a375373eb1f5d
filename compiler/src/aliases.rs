use lsp_bindgen_schema::TypeAlias;

use crate::{
    builder::{CodeBuilder, RegistryEntry},
    diagnostics::Diagnostics,
    error::SchemaError,
    resolver::TypeResolver,
    traits::Synthesize,
    utils::doc_block,
};

impl Synthesize for TypeAlias {
    fn synthesize(
        &self,
        resolver: &TypeResolver<'_>,
        diags: &mut Diagnostics,
    ) -> Result<RegistryEntry, SchemaError> {
        if resolver.options().is_builtin(&self.name) {
            let mut entry = RegistryEntry::new(&self.name, CodeBuilder::new());
            entry.external = true;
            return Ok(entry);
        }

        let resolved = resolver.resolve(&self.type_, false, &self.name, diags)?;

        let mut buf = CodeBuilder::new();
        if let Some(doc) = &self.documentation {
            buf.write_all(&doc_block(doc));
        }
        buf.write(&format!("using {} = {};", self.name, resolved.expr));
        buf.newline();

        Ok(RegistryEntry::new(&self.name, buf).with_dependencies(resolved.deps))
    }
}
