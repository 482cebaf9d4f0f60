//! The in-memory table every pipeline stage consumes and produces.
//!
//! A `Dataset` is an Arrow `RecordBatch`: an ordered list of named, typed
//! fields plus equally long columns. Missing cells are Arrow nulls. Every
//! operation returns a new `Dataset`; nothing is mutated in place.

use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, UInt32Array};
use arrow::compute::take_record_batch;
use arrow::record_batch::RecordBatch;
use arrow_schema::{Field, Schema, SchemaRef};

use crate::error::{AnalysisError, Result};
use crate::filter::core::filter_record_batch;

/// An ordered collection of records sharing one schema
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    batch: RecordBatch,
}

impl From<RecordBatch> for Dataset {
    fn from(batch: RecordBatch) -> Self {
        Self { batch }
    }
}

impl Dataset {
    /// Wrap an existing record batch
    #[must_use]
    pub fn new(batch: RecordBatch) -> Self {
        Self { batch }
    }

    /// Build a dataset from a schema and matching columns
    pub fn try_new(schema: SchemaRef, columns: Vec<ArrayRef>) -> Result<Self> {
        Ok(Self::new(RecordBatch::try_new(schema, columns)?))
    }

    #[must_use]
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    #[must_use]
    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    #[must_use]
    pub fn num_fields(&self) -> usize {
        self.batch.num_columns()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// Field names in schema order
    #[must_use]
    pub fn field_names(&self) -> Vec<String> {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.batch.schema_ref().index_of(name).is_ok()
    }

    /// Position of a field, or a `FieldError` if it is absent
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.batch
            .schema_ref()
            .index_of(name)
            .map_err(|_| AnalysisError::field_not_found(name))
    }

    /// Column by name, or a `FieldError` if it is absent
    pub fn column(&self, name: &str) -> Result<&ArrayRef> {
        let idx = self.index_of(name)?;
        Ok(self.batch.column(idx))
    }

    /// Copy of this dataset without the named field
    pub fn without_field(&self, name: &str) -> Result<Self> {
        let idx = self.index_of(name)?;
        let mut batch = self.batch.clone();
        batch.remove_column(idx);
        Ok(Self::new(batch))
    }

    /// Copy of this dataset with `array` appended as a new last field
    pub fn with_field(&self, field: Field, array: ArrayRef) -> Result<Self> {
        if self.has_field(field.name()) {
            return Err(AnalysisError::field(format!(
                "Field '{}' already exists",
                field.name()
            )));
        }

        let schema = self.batch.schema();
        let mut fields: Vec<Arc<Field>> = schema.fields().iter().cloned().collect();
        fields.push(Arc::new(field));

        let mut columns = self.batch.columns().to_vec();
        columns.push(array);

        let schema = Arc::new(Schema::new_with_metadata(fields, schema.metadata().clone()));
        Self::try_new(schema, columns)
    }

    /// Copy of this dataset restricted to the named fields, in the given order
    pub fn project(&self, names: &[&str]) -> Result<Self> {
        let indices = names
            .iter()
            .map(|name| self.index_of(name))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(self.batch.project(&indices)?))
    }

    /// Rows selected by `mask`, in original order
    pub fn filter(&self, mask: &BooleanArray) -> Result<Self> {
        Ok(Self::new(filter_record_batch(&self.batch, mask)?))
    }

    /// Rows at the given positions, in the given order
    ///
    /// # Errors
    /// Returns a `SchemaError` for a position beyond the 32-bit take range.
    pub fn take(&self, rows: &[usize]) -> Result<Self> {
        let indices = rows
            .iter()
            .map(|&row| {
                u32::try_from(row).map_err(|_| {
                    AnalysisError::schema(format!("Row {row} is beyond the 32-bit index range"))
                })
            })
            .collect::<Result<Vec<u32>>>()?;
        let indices = UInt32Array::from(indices);
        Ok(Self::new(take_record_batch(&self.batch, &indices)?))
    }
}
