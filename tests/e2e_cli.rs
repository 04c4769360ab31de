mod cli_helpers;

use assert_cmd::prelude::*;
use cli_helpers::{base_cmd, chart_path, run_cmd, write_config};
use predicates::prelude::*;
use tempfile::TempDir;

fn setup_temp_home() -> TempDir {
    TempDir::new().expect("failed to create temp home")
}

#[test]
fn ratios_lists_every_ratio() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.arg("ratios");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Current Ratio"))
        .stdout(predicate::str::contains("Net Profit Margin"))
        .stdout(predicate::str::contains("Return on Assets"))
        .stdout(predicate::str::contains("Debt to Equity"))
        .stdout(predicate::str::contains("Total Liabilities Net Minority Interest"));
}

#[test]
fn analyze_prints_tables_and_writes_charts() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.args(["analyze", "--tickers", "aaa,BBB", "--charts-dir", "out"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--- AAA BALANCE SHEET COLUMNS ---"))
        .stdout(predicate::str::contains("--- BBB INCOME STATEMENT COLUMNS ---"))
        .stdout(predicate::str::contains("Current Ratio"))
        .stdout(predicate::str::contains("2.000"))
        .stdout(predicate::str::contains("Company Comparison (Averages)"))
        .stdout(predicate::str::contains("Avg Net Profit Margin"))
        .stdout(predicate::str::contains("Avg Debt to Equity"))
        .stdout(predicate::str::contains("0.125"))
        .stdout(predicate::str::contains("Avg Current Ratio").not())
        .stdout(predicate::str::contains("Saved"))
        .stdout(predicate::str::contains("\u{001b}[").not());

    assert!(chart_path(&home, "out", "net_profit_margin.png").exists());
    assert!(chart_path(&home, "out", "debt_to_equity.png").exists());
}

#[test]
fn analyze_skips_chart_without_data() {
    let home = setup_temp_home();

    let output = run_cmd(
        &home,
        &[
            "analyze",
            "--tickers",
            "BBB",
            "--chart",
            "Debt to Equity",
            "--chart",
            "Quick Ratio",
        ],
    )
    .expect("analyze should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("No data available to plot Debt to Equity"));
    assert!(stdout.contains("No data available to plot Quick Ratio"));
    assert!(!chart_path(&home, "charts", "").exists());
}

#[test]
fn analyze_unknown_ticker_fails_offline() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.args(["analyze", "--tickers", "AAA,ZZZZ", "--charts-dir", "out"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("ZZZZ"))
        .stderr(predicate::str::contains("data unavailable"));

    // Nothing rendered when the run aborts
    assert!(!chart_path(&home, "out", "").exists());
}

#[test]
fn analyze_reads_config_file() {
    let home = setup_temp_home();
    write_config(
        &home,
        "tickers = [\"AAA\"]\ncharts = [\"Current Ratio\"]\ncharts_dir = \"from-config\"\n",
    );

    let mut cmd = base_cmd(&home);
    cmd.arg("analyze");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("AAA"))
        .stdout(predicate::str::contains("BBB").not());

    assert!(chart_path(&home, "from-config", "current_ratio.png").exists());
}

#[test]
fn analyze_rejects_invalid_config_file() {
    let home = setup_temp_home();
    write_config(&home, "tickers = \"AAA\"\n");

    let mut cmd = base_cmd(&home);
    cmd.arg("analyze");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn columns_lists_all_statements() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.args(["columns", "AAA"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--- AAA INCOME STATEMENT COLUMNS ---"))
        .stdout(predicate::str::contains("--- AAA CASH FLOW COLUMNS ---"))
        .stdout(predicate::str::contains("Free Cash Flow"))
        .stdout(predicate::str::contains("2021-12-31 to 2023-12-31"));
}

#[test]
fn columns_unknown_ticker_fails_without_listing() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.args(["columns", "ZZZZ"]);

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("COLUMNS").not())
        .stderr(predicate::str::contains("data unavailable for ZZZZ"));
}
