use serde_json::Value;
use std::io::{self, Write};

/// Column width used when no minimum is given.
pub const DEFAULT_MIN_WIDTH: usize = 2;

/// Writes [SPARQL JSON results](https://www.w3.org/TR/sparql11-results-json/) as an aligned text table.
///
/// Each column is as wide as its longest value, its `?variable` header, and `min_width`.
/// Unbound variables are written as empty cells.
///
/// ```
/// use sparqlwrapper::write_results_table;
///
/// let results = serde_json::json!({
///     "head": {"vars": ["label"]},
///     "results": {"bindings": [{"label": {"type": "literal", "value": "Asturias"}}]}
/// });
/// let mut output = Vec::new();
/// write_results_table(&results, None, &mut output)?;
/// assert_eq!(
///     String::from_utf8(output)?,
///     "?label   | \n===========\nAsturias | \n"
/// );
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub fn write_results_table(
    results: &Value,
    min_width: Option<usize>,
    output: &mut impl Write,
) -> io::Result<()> {
    let variables = results
        .pointer("/head/vars")
        .and_then(Value::as_array)
        .ok_or_else(|| invalid_results("head.vars array is missing"))?
        .iter()
        .map(|variable| {
            variable
                .as_str()
                .ok_or_else(|| invalid_results("variable names must be strings"))
        })
        .collect::<io::Result<Vec<_>>>()?;
    let rows = results
        .pointer("/results/bindings")
        .and_then(Value::as_array)
        .map(|bindings| {
            bindings
                .iter()
                .map(|binding| {
                    variables
                        .iter()
                        .map(|variable| {
                            binding
                                .get(variable)
                                .and_then(|term| term.get("value"))
                                .and_then(Value::as_str)
                                .unwrap_or_default()
                        })
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let min_width = min_width.unwrap_or(DEFAULT_MIN_WIDTH);
    let mut widths = variables
        .iter()
        .map(|variable| min_width.max(variable.chars().count() + 1))
        .collect::<Vec<_>>();
    for row in &rows {
        for (width, value) in widths.iter_mut().zip(row) {
            *width = (*width).max(value.chars().count());
        }
    }

    for (variable, width) in variables.iter().zip(&widths) {
        write!(output, "{:<width$} | ", format!("?{variable}"))?;
    }
    writeln!(output)?;
    writeln!(
        output,
        "{}",
        "=".repeat(widths.iter().sum::<usize>() + 3 * widths.len())
    )?;
    for row in &rows {
        for (value, width) in row.iter().zip(&widths) {
            write!(output, "{value:<width$} | ")?;
        }
        writeln!(output)?;
    }
    Ok(())
}

fn invalid_results(message: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("Invalid SPARQL JSON results: {message}"),
    )
}
