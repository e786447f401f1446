//! Config load validation tests for lifestyle-risk-config.
// crates/lifestyle-risk-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding, keys).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

#![allow(clippy::use_debug, reason = "Debug output is used in failure messages.")]

use std::io::Write;
use std::path::Path;

use lifestyle_risk_config::LogFormat;
use lifestyle_risk_config::RiskConfig;
use lifestyle_risk_config::StoreType;
use lifestyle_risk_core::MessageVariant;
use lifestyle_risk_store_sqlite::SqliteStoreMode;
use tempfile::NamedTempFile;

mod common;

use common::assert_invalid;

type TestResult = Result<(), String>;

fn write_config(contents: &str) -> Result<NamedTempFile, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(contents.as_bytes()).map_err(|err| err.to_string())?;
    Ok(file)
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    let path = Path::new(&long_path);
    assert_invalid(RiskConfig::load(Some(path)), "config path exceeds max length")?;
    Ok(())
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    assert_invalid(RiskConfig::load(Some(path)), "config path component too long")?;
    Ok(())
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'a'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(RiskConfig::load(Some(file.path())), "config file exceeds size limit")?;
    Ok(())
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(RiskConfig::load(Some(file.path())), "config file must be utf-8")?;
    Ok(())
}

#[test]
fn load_rejects_missing_explicit_file() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    assert_invalid(RiskConfig::load(Some(&path)), "config io error")?;
    Ok(())
}

#[test]
fn load_rejects_unknown_keys() -> TestResult {
    let file = write_config("[server]\nbind = \"127.0.0.1:8080\"\nworkers = 4\n")?;
    assert_invalid(RiskConfig::load(Some(file.path())), "config parse error")?;
    let file = write_config("[metrics]\nenabled = true\n")?;
    assert_invalid(RiskConfig::load(Some(file.path())), "config parse error")?;
    Ok(())
}

#[test]
fn load_rejects_unknown_variant() -> TestResult {
    let file = write_config("[responder]\nvariant = \"verbose\"\n")?;
    assert_invalid(RiskConfig::load(Some(file.path())), "config parse error")?;
    Ok(())
}

#[test]
fn empty_file_uses_defaults() -> TestResult {
    let file = write_config("")?;
    let config = RiskConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config != RiskConfig::default() {
        return Err(format!("expected defaults, got {config:?}"));
    }
    if config.server.bind != "127.0.0.1:8080" || config.server.max_body_bytes != 65_536 {
        return Err("unexpected server defaults".to_string());
    }
    if config.server.cors_allowed_origins != vec!["https://dialogflow.cloud.google.com"] {
        return Err("unexpected cors defaults".to_string());
    }
    if config.responder.variant != MessageVariant::Informational {
        return Err("informational must be the default variant".to_string());
    }
    if config.store.store_type != StoreType::None || config.store.sqlite().is_some() {
        return Err("store must be disabled by default".to_string());
    }
    Ok(())
}

#[test]
fn full_file_round_trips_every_section() -> TestResult {
    let file = write_config(
        r#"
[server]
bind = "0.0.0.0:9000"
max_body_bytes = 4096
cors_allowed_origins = ["https://dialogflow.cloud.google.com", "http://localhost:3000"]

[model]
path = "/srv/models/forest.json"

[responder]
variant = "terse"

[store]
type = "sqlite"
path = "data/predictions.sqlite"
busy_timeout_ms = 2500
journal_mode = "delete"
sync_mode = "normal"
max_records = 500

[logging]
level = "debug"
format = "json"
"#,
    )?;
    let config = RiskConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    let bind = config.server.bind_addr().map_err(|err| err.to_string())?;
    if bind.port() != 9000 || config.server.cors_allowed_origins.len() != 2 {
        return Err("server section not applied".to_string());
    }
    if config.responder.variant != MessageVariant::Terse {
        return Err("responder section not applied".to_string());
    }
    let Some(sqlite) = config.store.sqlite() else {
        return Err("sqlite store expected".to_string());
    };
    if sqlite.busy_timeout_ms != 2500
        || sqlite.journal_mode != SqliteStoreMode::Delete
        || sqlite.max_records != Some(500)
    {
        return Err(format!("sqlite section not applied: {sqlite:?}"));
    }
    if config.logging.level != "debug" || config.logging.format != LogFormat::Json {
        return Err("logging section not applied".to_string());
    }
    Ok(())
}

#[test]
fn shipped_sample_config_is_valid() -> TestResult {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../configs/lifestyle-risk.toml");
    let config = RiskConfig::load(Some(path.as_path())).map_err(|err| err.to_string())?;
    if config.store.store_type != StoreType::Sqlite {
        return Err("sample config should enable the sqlite store".to_string());
    }
    if config.responder.variant != MessageVariant::Informational {
        return Err("sample config should use informational wording".to_string());
    }
    Ok(())
}
