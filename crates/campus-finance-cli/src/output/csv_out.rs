use serde_json::Value;
use std::io;

/// Write output as CSV to stdout.
///
/// Projections and solver runs emit one row per year; anything else becomes
/// a two-column `field,value` listing.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value.get("result").unwrap_or(value);
    match result.get("years") {
        Some(Value::Array(years)) => write_rows(&mut wtr, years),
        _ => match result {
            Value::Object(map) => {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            }
            Value::Array(rows) => write_rows(&mut wtr, rows),
            other => {
                let _ = wtr.write_record([&format_csv_value(other)]);
            }
        },
    }

    let _ = wtr.flush();
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let _ = wtr.write_record(&headers);
    for row in rows.iter().filter_map(Value::as_object) {
        let record: Vec<String> = headers
            .iter()
            .map(|h| row.get(*h).map(format_csv_value).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&record);
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_year_rows_written_with_headers() {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_rows(
            &mut wtr,
            &[
                json!({"year": 2023, "cash": "1000000"}),
                json!({"year": 2024, "cash": "1250000"}),
            ],
        );
        let text = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("year") && lines[0].contains("cash"));
        assert!(lines[2].contains("2024") && lines[2].contains("1250000"));
    }
}
