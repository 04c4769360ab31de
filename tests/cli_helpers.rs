#![allow(dead_code)]

use anyhow::{bail, Result};
use assert_cmd::cargo;
use finratios::statements::{FinancialTable, FiscalPeriod, Statements};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn cache_root_for_home(home: &TempDir) -> PathBuf {
    if cfg!(target_os = "macos") {
        home.path().join("Library").join("Caches")
    } else {
        home.path().join(".cache")
    }
}

pub fn config_root_for_home(home: &TempDir) -> PathBuf {
    if cfg!(target_os = "macos") {
        home.path().join("Library").join("Application Support")
    } else {
        home.path().join(".config")
    }
}

fn years(ys: &[i32]) -> Vec<FiscalPeriod> {
    ys.iter().map(|y| FiscalPeriod::year_end(*y)).collect()
}

/// AAA: full set of line items over 2022-2023
pub fn aaa_statements() -> Statements {
    let income = FinancialTable::new(years(&[2021, 2022, 2023]))
        .with_column("Total Revenue", vec![Some(80.0), Some(100.0), Some(200.0)])
        .and_then(|t| t.with_column("Net Income", vec![Some(8.0), Some(10.0), Some(30.0)]))
        .expect("valid income fixture");
    let balance = FinancialTable::new(years(&[2022, 2023]))
        .with_column("Current Assets", vec![Some(100.0), Some(120.0)])
        .and_then(|t| t.with_column("Current Liabilities", vec![Some(50.0), Some(60.0)]))
        .and_then(|t| t.with_column("Total Assets", vec![Some(400.0), Some(500.0)]))
        .and_then(|t| {
            t.with_column(
                "Total Liabilities Net Minority Interest",
                vec![Some(300.0), Some(250.0)],
            )
        })
        .and_then(|t| t.with_column("Stockholders Equity", vec![Some(100.0), Some(250.0)]))
        .expect("valid balance fixture");
    let cash_flow = FinancialTable::new(years(&[2022, 2023]))
        .with_column("Free Cash Flow", vec![Some(12.0), Some(18.0)])
        .expect("valid cash flow fixture");
    Statements {
        income,
        balance,
        cash_flow,
    }
}

/// BBB: a bank-like balance sheet without current assets
pub fn bbb_statements() -> Statements {
    let income = FinancialTable::new(years(&[2022, 2023]))
        .with_column("Total Revenue", vec![Some(50.0), Some(0.0)])
        .and_then(|t| t.with_column("Net Income", vec![Some(5.0), Some(4.0)]))
        .expect("valid income fixture");
    let balance = FinancialTable::new(years(&[2022, 2023]))
        .with_column("Current Liabilities", vec![Some(50.0), Some(60.0)])
        .and_then(|t| t.with_column("Total Assets", vec![Some(1000.0), None]))
        .expect("valid balance fixture");
    Statements {
        income,
        balance,
        ..Default::default()
    }
}

pub fn seed_statements_cache(home: &TempDir, ticker: &str, statements: &Statements) {
    let dir = cache_root_for_home(home)
        .join("finratios")
        .join("statements")
        .join("annual");
    std::fs::create_dir_all(&dir).expect("failed to create statements cache dir");
    let json = serde_json::to_vec_pretty(statements).expect("failed to serialize statements");
    std::fs::write(dir.join(format!("{}.json", ticker)), json)
        .expect("failed to write statements fixture");
}

pub fn write_config(home: &TempDir, content: &str) -> PathBuf {
    let dir = config_root_for_home(home).join("finratios");
    std::fs::create_dir_all(&dir).expect("failed to create config dir");
    let path = dir.join("config.toml");
    std::fs::write(&path, content).expect("failed to write config");
    path
}

/// Offline command rooted in a temporary HOME, cache pre-seeded with AAA and BBB
pub fn base_cmd(home: &TempDir) -> Command {
    seed_statements_cache(home, "AAA", &aaa_statements());
    seed_statements_cache(home, "BBB", &bbb_statements());

    let mut cmd = Command::new(cargo::cargo_bin!("finratios"));
    cmd.current_dir(home.path());
    cmd.env("HOME", home.path());
    cmd.env("XDG_CACHE_HOME", cache_root_for_home(home));
    cmd.env("XDG_CONFIG_HOME", config_root_for_home(home));
    cmd.env("FINRATIOS_OFFLINE", "1");
    cmd.env_remove("RUST_LOG");
    cmd.arg("--no-color");
    cmd
}

pub fn run_cmd(home: &TempDir, args: &[&str]) -> Result<Output> {
    let mut cmd = base_cmd(home);
    cmd.args(args);
    let output = cmd.output()?;
    if !output.status.success() {
        bail!(
            "command failed: {:?}\nstdout: {}\nstderr: {}",
            args,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(output)
}

pub fn chart_path(home: &TempDir, dir: &str, file: &str) -> PathBuf {
    Path::new(home.path()).join(dir).join(file)
}
