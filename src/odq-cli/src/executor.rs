//! Runs one query invocation end to end.

use std::fs;
use std::io::{self, Read, Write};

use anyhow::Context;
use serde_json::Value;

use odq_mongo::MongoQueryBuilder;
use odq_odata::DocumentQuery;

use crate::cli::Cli;

/// Executes the pipeline described by one set of CLI arguments.
pub struct Executor {
    cli: Cli,
}

impl Executor {
    /// Wraps parsed arguments for execution.
    pub fn new(cli: Cli) -> Self {
        Executor { cli }
    }

    /// Parses the query, then applies it or emits the translated spec.
    pub fn execute(&self) -> anyhow::Result<()> {
        let query = DocumentQuery::parse(&self.cli.query)
            .with_context(|| format!("failed to parse query `{}`", self.cli.query))?;

        let output = if self.cli.emit_query {
            let spec = MongoQueryBuilder::new()
                .build(&query)
                .context("query cannot be translated to a MongoDB spec")?;
            serde_json::to_value(spec).context("failed to serialize query spec")?
        } else {
            let documents = self.read_documents()?;
            log::info!("applying query to {} document(s)", documents.len());
            Value::Array(query.apply(&documents)?)
        };

        self.write_output(&output)
    }

    fn read_documents(&self) -> anyhow::Result<Vec<Value>> {
        let text = match &self.cli.input {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
            None => {
                let mut buffer = String::new();
                io::stdin()
                    .read_to_string(&mut buffer)
                    .context("failed to read stdin")?;
                buffer
            }
        };
        let parsed: Value = serde_json::from_str(&text).context("input is not valid JSON")?;
        match parsed {
            Value::Array(documents) => Ok(documents),
            other => anyhow::bail!(
                "input must be a JSON array of documents, got {}",
                type_name(&other)
            ),
        }
    }

    fn write_output(&self, output: &Value) -> anyhow::Result<()> {
        let rendered = if self.cli.pretty {
            serde_json::to_string_pretty(output)?
        } else {
            serde_json::to_string(output)?
        };
        match &self.cli.output {
            Some(path) => fs::write(path, rendered + "\n")
                .with_context(|| format!("failed to write {}", path.display()))?,
            None => {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                writeln!(handle, "{rendered}").context("failed to write stdout")?;
            }
        }
        Ok(())
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn cli(query: &str, input: Option<std::path::PathBuf>, emit_query: bool) -> Cli {
        Cli {
            query: query.to_string(),
            input,
            output: None,
            emit_query,
            pretty: false,
            verbose: 0,
            quiet: true,
        }
    }

    #[test]
    fn applies_query_to_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("people.json");
        let output = dir.path().join("out.json");
        fs::write(
            &input,
            json!([
                {"Name": "Alice", "Age": 34},
                {"Name": "Bob", "Age": 28},
            ])
            .to_string(),
        )
        .unwrap();

        let mut cli = cli("$filter=Age gt 30", Some(input), false);
        cli.output = Some(output.clone());
        Executor::new(cli).execute().unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written, json!([{"Name": "Alice", "Age": 34}]));
    }

    #[test]
    fn emits_query_specs() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("spec.json");

        let mut cli = cli("$filter=Age gt 30&$top=5", None, true);
        cli.output = Some(output.clone());
        Executor::new(cli).execute().unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(
            written,
            json!({
                "filter": {"Age": {"$gt": 30.0}},
                "sort": {},
                "skip": null,
                "limit": 5,
            })
        );
    }

    #[test]
    fn rejects_non_array_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("object.json");
        fs::write(&input, "{}").unwrap();

        let result = Executor::new(cli("$filter=Age gt 30", Some(input), false)).execute();
        assert!(result.is_err());
    }
}
