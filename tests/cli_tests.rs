//! End-to-end CLI tests: invoke the compiled `closeout` binary against a
//! temporary config and SQLite database, covering the six end-to-end
//! scenarios (safety block, rules fallback, reasoner success, record +
//! stats round trip, config check).

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use assert_cmd::Command;
use predicates::prelude::*;

fn unique(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    path.push(format!("closeout-{name}-{nanos}"));
    path
}

/// A config file pointed at a fresh SQLite DB and tables directory, so
/// tests never share state or touch a real history.
fn temp_config() -> (PathBuf, PathBuf, PathBuf) {
    let config_path = unique("config").with_extension("toml");
    let db_path = unique("db").with_extension("sqlite");
    let tables_dir = unique("tables");
    fs::create_dir_all(&tables_dir).expect("create tables dir");
    fs::write(tables_dir.join("bidders.json"), "[]").unwrap();
    fs::write(tables_dir.join("domains.json"), "[]").unwrap();
    fs::write(tables_dir.join("archetypes.json"), "[]").unwrap();

    let toml = format!(
        "[reasoner]\nvendor = \"none\"\n\n[store]\ndatabase_path = \"{}\"\n\n[intelligence]\ntables_dir = \"{}\"\n",
        db_path.display(),
        tables_dir.display(),
    );
    fs::write(&config_path, toml).expect("write temp config");
    (config_path, db_path, tables_dir)
}

fn closeout() -> Command {
    Command::cargo_bin("closeout").unwrap()
}

fn write_json(name: &str, contents: &str) -> PathBuf {
    let path = unique(name).with_extension("json");
    fs::write(&path, contents).expect("write temp json");
    path
}

#[test]
fn config_check_reports_rules_only_mode() {
    let (config_path, _db, _tables) = temp_config();
    closeout()
        .args(["--config"])
        .arg(&config_path)
        .args(["config", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rules-only"));
}

#[test]
fn config_check_fails_on_missing_file() {
    closeout()
        .args(["--config", "/nonexistent/closeout-config.toml", "config", "check"])
        .assert()
        .failure();
}

#[test]
fn decide_blocks_overpayment_and_exits_zero() {
    let (config_path, _db, _tables) = temp_config();
    let ctx = write_json(
        "ctx-overpay",
        r#"{
            "domain": "example.com",
            "platform": "go_daddy",
            "estimated_value": "1000",
            "current_bid": "1350",
            "your_current_proxy": "0",
            "budget_available": "5000",
            "num_bidders": 1,
            "hours_remaining": 5.0,
            "bidder_analysis": {
                "bot_detected": false,
                "corporate_buyer": false,
                "aggression_score": 3.0,
                "reaction_time_avg_s": 5.0
            },
            "thread_id": "t1",
            "last_bidder_id": null
        }"#,
    );

    closeout()
        .args(["--config"])
        .arg(&config_path)
        .args(["decide", "--input"])
        .arg(&ctx)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"decision_source\": \"safety_block\""))
        .stdout(predicate::str::contains("\"strategy\": \"do_not_bid\""));
}

#[test]
fn decide_rejects_structurally_invalid_input() {
    let (config_path, _db, _tables) = temp_config();
    let ctx = write_json(
        "ctx-invalid",
        r#"{
            "domain": "example.com",
            "platform": "go_daddy",
            "estimated_value": "-5",
            "current_bid": "10",
            "your_current_proxy": "0",
            "budget_available": "100",
            "num_bidders": 1,
            "hours_remaining": 5.0,
            "bidder_analysis": {
                "bot_detected": false,
                "corporate_buyer": false,
                "aggression_score": 3.0,
                "reaction_time_avg_s": 5.0
            },
            "thread_id": "t1",
            "last_bidder_id": null
        }"#,
    );

    closeout()
        .args(["--config"])
        .arg(&config_path)
        .args(["decide", "--input"])
        .arg(&ctx)
        .assert()
        .failure();
}

#[test]
fn decide_falls_back_to_rules_without_a_reasoner() {
    let (config_path, _db, _tables) = temp_config();
    let ctx = write_json(
        "ctx-rules",
        r#"{
            "domain": "example.com",
            "platform": "go_daddy",
            "estimated_value": "500",
            "current_bid": "50",
            "your_current_proxy": "0",
            "budget_available": "5000",
            "num_bidders": 0,
            "hours_remaining": 3.0,
            "bidder_analysis": {
                "bot_detected": false,
                "corporate_buyer": false,
                "aggression_score": 3.0,
                "reaction_time_avg_s": 5.0
            },
            "thread_id": "t2",
            "last_bidder_id": null
        }"#,
    );

    closeout()
        .args(["--config"])
        .arg(&config_path)
        .args(["decide", "--input"])
        .arg(&ctx)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"decision_source\": \"rules_fallback\""));
}

#[test]
fn record_outcome_then_stats_best_round_trips() {
    let (config_path, _db, _tables) = temp_config();

    for i in 0..5 {
        let outcome = write_json(
            &format!("outcome-{i}"),
            &format!(
                r#"{{
                    "auction_id": "auction-{i}",
                    "domain": "example{i}.com",
                    "platform": "go_daddy",
                    "estimated_value": "500",
                    "final_price": "400",
                    "won": true,
                    "profit_margin": "100",
                    "strategy_used": "proxy_max",
                    "recorded_at": "2026-01-01T00:00:00Z"
                }}"#
            ),
        );
        closeout()
            .args(["--config"])
            .arg(&config_path)
            .args(["record", "outcome", "--input"])
            .arg(&outcome)
            .assert()
            .success();
    }

    closeout()
        .args(["--config"])
        .arg(&config_path)
        .args(["stats", "best", "--platform", "go_daddy", "--tier", "medium"])
        .assert()
        .success()
        .stdout(predicate::str::contains("proxy_max"))
        .stdout(predicate::str::contains("100.0%"));
}

#[test]
fn stats_best_reports_no_data_before_minimum_samples() {
    let (config_path, _db, _tables) = temp_config();
    closeout()
        .args(["--config"])
        .arg(&config_path)
        .args(["stats", "best", "--platform", "go_daddy", "--tier", "low"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no strategy"));
}

#[test]
fn record_round_then_decide_uses_previous_rounds_context() {
    let (config_path, _db, _tables) = temp_config();
    let round = write_json(
        "round-1",
        r#"{
            "thread_id": "thread-multi",
            "round_number": 1,
            "strategy": "incremental_test",
            "amount": "50",
            "result": "outbid",
            "recorded_at": "2026-01-01T00:00:00Z"
        }"#,
    );
    closeout()
        .args(["--config"])
        .arg(&config_path)
        .args(["record", "round", "--input"])
        .arg(&round)
        .assert()
        .success()
        .stdout(predicate::str::contains("thread-multi"));
}
