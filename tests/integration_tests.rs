use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

const DATA: &str = "test/customer_shopping_data.csv";

/// Helper function to run salesdash with arguments and optional stdin
fn run_salesdash(args: &[&str], stdin: Option<&[u8]>) -> Result<String, String> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_salesdash"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    if let Some(mut handle) = child.stdin.take() {
        if let Some(input) = stdin {
            handle
                .write_all(input)
                .map_err(|e| format!("Failed to write to stdin: {}", e))?;
        }
    }

    let output = child
        .wait_with_output()
        .map_err(|e| format!("Failed to wait for process: {}", e))?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

/// Check if bytes are a valid PNG
fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
}

#[test]
fn test_end_to_end_default_state_is_empty() {
    let out = run_salesdash(&[DATA], None).unwrap();
    assert!(out.starts_with("Sales Analysis\n"));
    assert!(out.contains("Showing data for Kanyon shopping mall, Clothing category, and 0 payment method(s)"));
    assert!(out.contains("Number of transactions: 0"));
    assert!(out.contains("Total sales: 0.00"));
}

#[test]
fn test_end_to_end_summary() {
    let out = run_salesdash(
        &[DATA, "--mall", "Kanyon", "--category", "Clothing", "--payment", "Cash"],
        None,
    )
    .unwrap();
    assert!(out.contains("Number of transactions: 4"), "{}", out);
    assert!(out.contains("Total sales: 3000.80"), "{}", out);
}

#[test]
fn test_end_to_end_age_range() {
    let out = run_salesdash(
        &[
            DATA, "--mall", "Kanyon", "--category", "Clothing", "--payment", "Cash",
            "--age-min", "18", "--age-max", "40",
        ],
        None,
    )
    .unwrap();
    assert!(out.contains("Number of transactions: 2"), "{}", out);
    assert!(out.contains("Total sales: 900.24"), "{}", out);
}

#[test]
fn test_end_to_end_invalid_age_range() {
    let result = run_salesdash(&[DATA, "--age-min", "50", "--age-max", "20"], None);
    assert!(result.unwrap_err().contains("exceeds"));
}

#[test]
fn test_end_to_end_bar_order_and_table() {
    let out = run_salesdash(
        &[
            DATA, "--mall", "Kanyon", "--category", "Clothing",
            "--payment", "Cash", "--payment", "Credit Card", "--payment", "Debit Card",
            "--bar", "--show-table",
        ],
        None,
    )
    .unwrap();
    let credit = out.find("Credit Card  3600.96").expect("credit card bar");
    let cash = out.find("Cash         3000.80").expect("cash bar");
    let debit = out.find("Debit Card   1200.32").expect("debit card bar");
    assert!(credit < cash && cash < debit);
    assert!(out.contains("Filtered Data"));
    assert!(out.contains("I992454"));
    assert!(!out.contains("I317333"));
}

#[test]
fn test_end_to_end_json_view() {
    let out = run_salesdash(
        &[DATA, "--mall", "Kanyon", "--category", "Clothing", "--payment", "Cash", "--scatter", "--json"],
        None,
    )
    .unwrap();
    let view: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(view["summary"]["transactions"], 4);
    assert_eq!(view["scatter"]["points"].as_array().unwrap().len(), 4);
    assert!(view["bar"].is_null());
    assert!(view["table"].is_null());
}

#[test]
fn test_end_to_end_state_file() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("state.json");
    fs::write(
        &state_path,
        r#"{"mall": "Forum Istanbul", "category": "Shoes", "payment_methods": ["Cash", "Debit Card"]}"#,
    )
    .unwrap();
    let out = run_salesdash(&[DATA, "--state", state_path.to_str().unwrap()], None).unwrap();
    assert!(out.contains("Number of transactions: 2"), "{}", out);
    assert!(out.contains("Total sales: 4801.36"), "{}", out);
}

#[test]
fn test_end_to_end_chart_images() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("charts");
    run_salesdash(
        &[
            DATA, "--mall", "Kanyon", "--category", "Clothing", "--payment", "Cash",
            "--scatter", "--bar", "--out-dir", out_dir.to_str().unwrap(),
        ],
        None,
    )
    .unwrap();
    assert!(is_valid_png(&fs::read(out_dir.join("scatter.png")).unwrap()));
    assert!(is_valid_png(&fs::read(out_dir.join("bar.png")).unwrap()));
}

#[test]
fn test_end_to_end_empty_selection_still_renders_charts() {
    let dir = tempfile::tempdir().unwrap();
    run_salesdash(
        &[DATA, "--scatter", "--bar", "--out-dir", dir.path().to_str().unwrap(), "--format", "svg"],
        None,
    )
    .unwrap();
    let svg = fs::read_to_string(dir.path().join("bar.svg")).unwrap();
    assert!(svg.contains("<svg"));
    assert!(dir.path().join("scatter.svg").exists());
}

#[test]
fn test_end_to_end_vega_specs() {
    let dir = tempfile::tempdir().unwrap();
    run_salesdash(
        &[
            DATA, "--mall", "Kanyon", "--category", "Clothing", "--payment", "Cash",
            "--bar", "--vega", dir.path().to_str().unwrap(),
        ],
        None,
    )
    .unwrap();
    let spec: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("bar.vl.json")).unwrap()).unwrap();
    assert_eq!(spec["mark"], "bar");
    assert!(!dir.path().join("scatter.vl.json").exists());
}

#[test]
fn test_end_to_end_list_options() {
    let out = run_salesdash(&[DATA, "--list-options"], None).unwrap();
    assert!(out.contains("Shopping malls: Kanyon, Forum Istanbul, Istinye Park, Metrocity"));
    assert!(out.contains("Payment methods: Credit Card, Debit Card, Cash"));
    assert!(out.contains("Age range: 18-80"));
}

#[test]
fn test_end_to_end_stdio_loop() {
    let input = concat!(
        r#"{"payment_methods": ["Cash"]}"#,
        "\n",
        r#"{"payment_methods": ["Cash"], "age_range": [18, 40]}"#,
        "\n",
        r#"{"age_range": [60, 20]}"#,
        "\n",
    );
    let out = run_salesdash(&[DATA, "--stdio"], Some(input.as_bytes())).unwrap();
    let lines: Vec<serde_json::Value> = out
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["summary"]["transactions"], 4);
    assert_eq!(lines[1]["summary"]["transactions"], 2);
    assert!(lines[2]["error"].is_string());
}

#[test]
fn test_end_to_end_stdio_invalid_utf8_line() {
    let input = b"{\"mall\": \"\xff\"}\n{\"payment_methods\":[\"Cash\"]}\n";
    let out = run_salesdash(&[DATA, "--stdio"], Some(input)).unwrap();
    let lines: Vec<serde_json::Value> = out
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0]["error"].is_string());
    assert_eq!(lines[1]["summary"]["transactions"], 4);
}

#[test]
fn test_end_to_end_missing_file() {
    let result = run_salesdash(&["test/does_not_exist.csv"], None);
    assert!(result.unwrap_err().contains("Failed to open dataset"));
}

#[test]
fn test_end_to_end_malformed_file() {
    let result = run_salesdash(&["test/malformed.csv"], None);
    assert!(result.is_err(), "Should have failed with non-numeric age");
}
