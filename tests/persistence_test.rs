#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::io::Write;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_rocksdb_persistence_recovery() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    // 1. First run: one registration
    let mut csv1 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv1, "name,email,phone,courses,coupon,amount_paid,card_token").unwrap();
    writeln!(csv1, "Ada,ada@example.com,555,Cosmic Shower,,30000,tok_visa").unwrap();

    let mut cmd1 = Command::new(cargo_bin!("festreg"));
    cmd1.arg("finalize").arg(csv1.path()).arg("--db-path").arg(&db_path);

    let output1 = cmd1.output().expect("Failed to execute command");
    assert!(output1.status.success());
    let stdout1 = String::from_utf8_lossy(&output1.stdout);
    assert!(stdout1.contains("Ada,ada@example.com,non-member,$300.00,registered,,ch_000001"));

    // 2. Second run against the same database continues charge numbering
    let mut csv2 = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv2, "name,email,phone,courses,coupon,amount_paid,card_token").unwrap();
    writeln!(csv2, "Bo,bo@example.com,555,Wudang Tai Chi Chuan,,50000,tok_visa").unwrap();

    let mut cmd2 = Command::new(cargo_bin!("festreg"));
    cmd2.arg("finalize").arg(csv2.path()).arg("--db-path").arg(&db_path);

    let output2 = cmd2.output().expect("Failed to execute command");
    assert!(output2.status.success());
    let stdout2 = String::from_utf8_lossy(&output2.stdout);
    assert!(stdout2.contains("Bo,bo@example.com,non-member,$500.00,registered,,ch_000002"));

    let stderr2 = String::from_utf8_lossy(&output2.stderr);
    assert!(stderr2.contains("stored=2"));
}
