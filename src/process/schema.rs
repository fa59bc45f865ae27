use crate::process::{utils, RawTable};
use anyhow::{bail, Result};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use tracing::debug;

/// Holds the inferred schema for one table
#[derive(Debug, Clone)]
pub struct SchemaInfo {
    pub schema: Schema,
    pub table_name: String,
}

/// Infer one nullable field per header from every non-missing cell of the
/// column. Columns with no values at all are text.
pub fn infer_schema(table: &RawTable, table_name: &str, infer_dates: bool) -> Result<SchemaInfo> {
    if table.headers.is_empty() {
        bail!("table `{}` has no columns", table_name);
    }

    let mut fields = Vec::with_capacity(table.headers.len());
    for (i, name) in table.headers.iter().enumerate() {
        let mut ty: Option<DataType> = None;
        for raw in table.column(i) {
            let cleaned = utils::clean_str(raw);
            if utils::is_null_token(cleaned) {
                continue;
            }
            let cell = utils::infer_arrow_dtype_from_str(cleaned, infer_dates);
            let next = match &ty {
                Some(prev) => utils::widen(prev, &cell),
                None => cell,
            };
            let settled = next == DataType::Utf8;
            ty = Some(next);
            if settled {
                break;
            }
        }
        let ty = ty.unwrap_or(DataType::Utf8);
        debug!(table = table_name, column = %name, dtype = ?ty, "inferred column type");
        fields.push(Field::new(name, ty, true));
    }

    Ok(SchemaInfo {
        schema: Schema::new(fields),
        table_name: table_name.to_string(),
    })
}

/// PostgreSQL column type for an inferred Arrow dtype.
pub fn pg_type_name(dt: &DataType) -> &'static str {
    match dt {
        DataType::Int64 => "BIGINT",
        DataType::Float64 => "DOUBLE PRECISION",
        DataType::Boolean => "BOOLEAN",
        DataType::Timestamp(TimeUnit::Microsecond, None) => "TIMESTAMP",
        _ => "TEXT",
    }
}
