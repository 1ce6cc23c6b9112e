use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Columns shown per year; the full record is available in JSON and CSV.
const YEAR_COLUMNS: [&str; 10] = [
    "year",
    "revenue",
    "ebitda",
    "net_result",
    "net_cash_flow",
    "cash",
    "short_term_debt",
    "total_assets",
    "total_equity",
    "zakat",
];

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => print_result(result, map),
            None => print_flat_object(map),
        },
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => {
            if let Some(Value::Array(years)) = res_map.get("years") {
                print_years(years);
                for section in ["summary", "solver", "metadata"] {
                    if let Some(Value::Object(part)) = res_map.get(section) {
                        println!("\n{}:", section);
                        print_flat_object(part);
                    }
                }
            } else {
                print_flat_object(res_map);
            }
        }
        other => println!("{}", format_value(other)),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_years(years: &[Value]) {
    if years.is_empty() {
        println!("(no years)");
        return;
    }

    let columns: Vec<&str> = match years.first() {
        Some(Value::Object(first)) => YEAR_COLUMNS
            .iter()
            .copied()
            .filter(|c| first.contains_key(*c))
            .collect(),
        _ => Vec::new(),
    };

    let mut builder = Builder::default();
    builder.push_record(columns.iter().copied());
    for year in years.iter().filter_map(Value::as_object) {
        builder.push_record(
            columns
                .iter()
                .map(|c| year.get(*c).map(format_value).unwrap_or_default()),
        );
    }
    println!("{}", Table::from(builder));
}

fn print_flat_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_value_variants() {
        assert_eq!(format_value(&json!("12.5")), "12.5");
        assert_eq!(format_value(&json!(null)), "-");
        assert_eq!(format_value(&json!([2028, 2029])), "2028, 2029");
    }
}
