use super::{QueryBuilder, Scope};
use crate::error::Result;
use crate::model::Model;

/// Hides soft-deleted documents: those carrying a deletion marker field.
///
/// Registering it also adds the `with_trashed` and `only_trashed` macros to the builder.
#[derive(Debug, Clone)]
pub struct SoftDeletingScope {
    column: String,
}

impl SoftDeletingScope {
    pub const IDENTIFIER: &'static str = "soft_deletes";

    pub fn new(column: &str) -> Self {
        Self {
            column: column.to_string(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }
}

impl Default for SoftDeletingScope {
    fn default() -> Self {
        Self::new("deleted_at")
    }
}

impl Scope for SoftDeletingScope {
    fn identifier(&self) -> &str {
        Self::IDENTIFIER
    }

    fn apply(&self, builder: &mut QueryBuilder, _model: Option<&dyn Model>) -> Result<()> {
        builder.where_missing(&self.column);
        Ok(())
    }

    fn extend(&self, builder: &mut QueryBuilder) {
        builder.register_macro("with_trashed", |builder, _| {
            builder.without_global_scope(Self::IDENTIFIER);
            Ok(())
        });

        let column = self.column.clone();
        builder.register_macro("only_trashed", move |builder, _| {
            builder.without_global_scope(Self::IDENTIFIER);
            builder.where_exists(&column);
            Ok(())
        });
    }
}
