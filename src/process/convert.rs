use crate::process::schema::SchemaInfo;
use crate::process::{date_parser, utils, RawTable};
use anyhow::{anyhow, Result};
use arrow::{
    array::{
        ArrayRef, BooleanBuilder, Float64Builder, Int64Builder, StringBuilder,
        TimestampMicrosecondBuilder,
    },
    datatypes::{DataType, TimeUnit},
    record_batch::{RecordBatch, RecordBatchOptions},
};
use std::sync::Arc;

/// Convert the string cells of `raw` into the column types of `schema_info`.
/// Missing cells (see [`utils::NULL_TOKENS`]) become nulls; any other cell
/// that no longer parses is an error.
pub fn convert_to_final_types(raw: &RawTable, schema_info: &SchemaInfo) -> Result<RecordBatch> {
    let mut out = Vec::with_capacity(raw.headers.len());

    for (i, fld) in schema_info.schema.fields().iter().enumerate() {
        let cells = raw.column(i).map(|s| {
            let c = utils::clean_str(s);
            (!utils::is_null_token(c)).then_some(c)
        });
        let bad = |v: &str| {
            anyhow!(
                "column `{}` of `{}`: cannot read {:?} as {}",
                fld.name(),
                schema_info.table_name,
                v,
                fld.data_type()
            )
        };

        let col: ArrayRef = match fld.data_type() {
            DataType::Int64 => {
                let mut b = Int64Builder::with_capacity(raw.num_rows());
                for cell in cells {
                    let v = cell.map(|v| v.parse::<i64>().map_err(|_| bad(v)));
                    b.append_option(v.transpose()?);
                }
                Arc::new(b.finish())
            }
            DataType::Float64 => {
                let mut b = Float64Builder::with_capacity(raw.num_rows());
                for cell in cells {
                    let v = cell.map(|v| v.parse::<f64>().map_err(|_| bad(v)));
                    b.append_option(v.transpose()?);
                }
                Arc::new(b.finish())
            }
            DataType::Boolean => {
                let mut b = BooleanBuilder::with_capacity(raw.num_rows());
                for cell in cells {
                    b.append_option(
                        cell.map(|v| utils::parse_bool(v).ok_or_else(|| bad(v)))
                            .transpose()?,
                    );
                }
                Arc::new(b.finish())
            }
            DataType::Timestamp(TimeUnit::Microsecond, None) => {
                let mut b = TimestampMicrosecondBuilder::with_capacity(raw.num_rows());
                for cell in cells {
                    let ts = cell
                        .map(|v| date_parser::parse_timestamp(v).ok_or_else(|| bad(v)))
                        .transpose()?;
                    b.append_option(ts.map(|t| t.and_utc().timestamp_micros()));
                }
                Arc::new(b.finish())
            }
            // text keeps the cell exactly as written
            _ => {
                let mut b = StringBuilder::new();
                for cell in raw.column(i) {
                    b.append_option((!utils::is_null_token(cell)).then_some(cell));
                }
                Arc::new(b.finish())
            }
        };
        out.push(col);
    }

    let schema = Arc::new(schema_info.schema.clone());
    let options = RecordBatchOptions::new().with_row_count(Some(raw.num_rows()));
    RecordBatch::try_new_with_options(schema, out, &options).map_err(Into::into)
}
