//! Command-line argument definitions for odq.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// odq - apply OData query expressions to JSON documents
///
/// odq parses an OData query string ($filter, $orderby, $skip, $top) and
/// either applies it to a JSON array of documents or prints the
/// equivalent MongoDB filter/sort specification.
#[derive(Parser, Debug)]
#[command(name = "odq")]
#[command(author, version, about)]
#[command(after_help = "EXAMPLES:\n  \
    # Filter and sort a JSON array file\n  \
    odq '$filter=Age gt 30&$orderby=Name desc' people.json\n\n  \
    # Read documents from stdin\n  \
    cat people.json | odq '$filter=startswith(Name, ''Jo'')'\n\n  \
    # Print the MongoDB query documents instead of applying the query\n  \
    odq --emit-query '$filter=Address/City eq ''Oslo''&$top=10'")]
pub struct Cli {
    /// The OData query expression, e.g. '$filter=Age gt 30&$top=5'
    #[arg(index = 1, value_name = "QUERY")]
    pub query: String,

    /// Input file containing a JSON array of documents (stdin if not
    /// specified)
    #[arg(index = 2, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print the translated MongoDB query spec instead of applying the
    /// query to documents
    #[arg(long)]
    pub emit_query: bool,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pub pretty: bool,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all logging
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Parses the process arguments.
pub fn parse_args() -> Cli {
    Cli::parse()
}
