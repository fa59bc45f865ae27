use super::sql;
use anyhow::{bail, Context, Result};
use arrow::{
    array::{
        Array, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray,
        TimestampMicrosecondArray,
    },
    record_batch::RecordBatch,
};
use tokio_postgres::{binary_copy::BinaryCopyInWriter, types::ToSql, Client};
use tracing::debug;

/// Sink defines the write interface between a converted table and the database.
#[async_trait::async_trait]
pub trait Sink: Send + Sync {
    /// Drop `table` if it exists, recreate it from the batch schema and write
    /// every row in batch order. Returns the number of rows written.
    async fn replace(&self, table: &str, batch: &RecordBatch) -> Result<u64>;
}

#[async_trait::async_trait]
impl Sink for Client {
    async fn replace(&self, table: &str, batch: &RecordBatch) -> Result<u64> {
        let schema = batch.schema();
        let types = sql::column_types(&schema)?;
        let columns = batch
            .columns()
            .iter()
            .map(Cells::try_from_array)
            .collect::<Result<Vec<_>>>()?;

        debug!(table, "dropping table");
        self.batch_execute(&sql::drop_table(table))
            .await
            .with_context(|| format!("dropping table `{}`", table))?;
        debug!(table, "creating table");
        self.batch_execute(&sql::create_table(table, &schema))
            .await
            .with_context(|| format!("creating table `{}`", table))?;

        let sink = self
            .copy_in(&sql::copy_in(table, &schema))
            .await
            .with_context(|| format!("starting COPY into `{}`", table))?;
        let writer = BinaryCopyInWriter::new(sink, &types);
        futures::pin_mut!(writer);
        for row in 0..batch.num_rows() {
            let values: Vec<_> = columns.iter().map(|c| c.value(row)).collect();
            let refs: Vec<&(dyn ToSql + Sync)> = values
                .iter()
                .map(|v| &**v as &(dyn ToSql + Sync))
                .collect();
            writer
                .as_mut()
                .write(&refs)
                .await
                .with_context(|| format!("writing row {} of `{}`", row, table))?;
        }
        let written = writer
            .finish()
            .await
            .with_context(|| format!("finishing COPY into `{}`", table))?;
        Ok(written)
    }
}

/// A batch column downcast once, read row by row.
enum Cells<'a> {
    Int(&'a Int64Array),
    Float(&'a Float64Array),
    Bool(&'a BooleanArray),
    Timestamp(&'a TimestampMicrosecondArray),
    Text(&'a StringArray),
}

impl<'a> Cells<'a> {
    fn try_from_array(arr: &'a ArrayRef) -> Result<Self> {
        let any = arr.as_any();
        if let Some(a) = any.downcast_ref::<Int64Array>() {
            Ok(Cells::Int(a))
        } else if let Some(a) = any.downcast_ref::<Float64Array>() {
            Ok(Cells::Float(a))
        } else if let Some(a) = any.downcast_ref::<BooleanArray>() {
            Ok(Cells::Bool(a))
        } else if let Some(a) = any.downcast_ref::<TimestampMicrosecondArray>() {
            Ok(Cells::Timestamp(a))
        } else if let Some(a) = any.downcast_ref::<StringArray>() {
            Ok(Cells::Text(a))
        } else {
            bail!("no COPY encoding for arrays of type {}", arr.data_type())
        }
    }

    fn value(&self, row: usize) -> Box<dyn ToSql + Sync + Send + 'a> {
        match *self {
            Cells::Int(a) => Box::new(a.is_valid(row).then(|| a.value(row))),
            Cells::Float(a) => Box::new(a.is_valid(row).then(|| a.value(row))),
            Cells::Bool(a) => Box::new(a.is_valid(row).then(|| a.value(row))),
            Cells::Timestamp(a) => {
                Box::new(a.is_valid(row).then(|| a.value_as_datetime(row)).flatten())
            }
            Cells::Text(a) => Box::new(a.is_valid(row).then(|| a.value(row))),
        }
    }
}
