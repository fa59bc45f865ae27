use crate::process::schema::pg_type_name;
use anyhow::{bail, Result};
use arrow::datatypes::{DataType, Schema, TimeUnit};
use tokio_postgres::types::Type;

/// Double-quote an identifier, doubling any embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn drop_table(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", quote_ident(table))
}

pub fn create_table(table: &str, schema: &Schema) -> String {
    let cols: Vec<String> = schema
        .fields()
        .iter()
        .map(|f| format!("{} {}", quote_ident(f.name()), pg_type_name(f.data_type())))
        .collect();
    format!("CREATE TABLE {} ({})", quote_ident(table), cols.join(", "))
}

pub fn copy_in(table: &str, schema: &Schema) -> String {
    let cols: Vec<String> = schema
        .fields()
        .iter()
        .map(|f| quote_ident(f.name()))
        .collect();
    format!(
        "COPY {} ({}) FROM STDIN BINARY",
        quote_ident(table),
        cols.join(", ")
    )
}

/// Wire types for the binary COPY, one per column.
pub fn column_types(schema: &Schema) -> Result<Vec<Type>> {
    schema
        .fields()
        .iter()
        .map(|f| {
            Ok(match f.data_type() {
                DataType::Int64 => Type::INT8,
                DataType::Float64 => Type::FLOAT8,
                DataType::Boolean => Type::BOOL,
                DataType::Timestamp(TimeUnit::Microsecond, None) => Type::TIMESTAMP,
                DataType::Utf8 => Type::TEXT,
                other => bail!("column `{}` has unsupported type {}", f.name(), other),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::Field;

    fn books() -> Schema {
        Schema::new(vec![
            Field::new("Book_ID", DataType::Int64, true),
            Field::new("Title", DataType::Utf8, true),
            Field::new("Price", DataType::Float64, true),
        ])
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("books"), "\"books\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn builds_ddl() {
        assert_eq!(drop_table("books"), "DROP TABLE IF EXISTS \"books\"");
        assert_eq!(
            create_table("books", &books()),
            "CREATE TABLE \"books\" (\"Book_ID\" BIGINT, \"Title\" TEXT, \"Price\" DOUBLE PRECISION)"
        );
        assert_eq!(
            copy_in("books", &books()),
            "COPY \"books\" (\"Book_ID\", \"Title\", \"Price\") FROM STDIN BINARY"
        );
    }

    #[test]
    fn maps_wire_types() -> Result<()> {
        assert_eq!(
            column_types(&books())?,
            vec![Type::INT8, Type::TEXT, Type::FLOAT8]
        );
        let odd = Schema::new(vec![Field::new("x", DataType::Int8, true)]);
        assert!(column_types(&odd).is_err());
        Ok(())
    }
}
