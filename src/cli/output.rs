//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::backend::Direction;
use crate::cli::args::{OutputFormat, ScanKind, ScanOp, SegScanArgs};
use crate::error::Result;
use crate::segmented::Flag;

/// Result structure for flag construction.
#[derive(Debug, Serialize, Deserialize)]
pub struct FlagsResult {
    pub boundary: String,
    pub flags: Vec<Flag>,
}

/// Result structure for scans.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScanResult {
    pub backend: String,
    pub op: ScanOp,
    pub kind: ScanKind,
    pub direction: Direction,
    pub segmented: bool,
    pub values: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sums: Option<Vec<i64>>,
    pub duration_us: u64,
}

/// Output a result in the format chosen on the command line.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &SegScanArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &SegScanArgs) -> Result<()> {
    if args.verbosity() > 1 {
        println!("{message}");
        println!();
    }

    // Convert to JSON value for easier manipulation
    let value = serde_json::to_value(result)?;
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                // Timing only shows up when asked for
                if key == "duration_us" && args.verbosity() < 2 {
                    continue;
                }
                println!("{key}: {}", format_value(&val));
            }
        }
        other => println!("{}", format_value(&other)),
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &SegScanArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for human output.
pub fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        serde_json::Value::Object(_) => "[object]".to_string(),
        serde_json::Value::Null => "null".to_string(),
    }
}
