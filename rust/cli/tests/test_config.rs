//! Configuration layering: defaults, then the `HOLDEX_CONFIG` file, then `HOLDEX_*` env.
//!
//! Every test mutates process environment, so they run one at a time.

use std::io::Write as _;

use holdex_cli::config::{self, ValueSource};
use holdex_cli::run;
use holdex_engine::equity::TieShare;
use serde_json::Value;
use serial_test::serial;

const VARS: &[&str] = &[
    "HOLDEX_CONFIG",
    "HOLDEX_SEED",
    "HOLDEX_BALANCE",
    "HOLDEX_ITERATIONS",
    "HOLDEX_TIE_SHARE",
    "HOLDEX_THREADS",
];

fn clear_env() {
    for v in VARS {
        unsafe {
            std::env::remove_var(v);
        }
    }
}

fn set_env(key: &str, value: &str) {
    unsafe {
        std::env::set_var(key, value);
    }
}

fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp config");
    f.write_all(contents.as_bytes()).expect("write config");
    f
}

fn cfg_json() -> Value {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run(["holdex", "cfg"], &mut out, &mut err);
    assert_eq!(code, 0, "stderr: {}", String::from_utf8_lossy(&err));
    serde_json::from_slice(&out).unwrap()
}

#[test]
#[serial]
fn defaults_without_file_or_env() {
    clear_env();
    let json = cfg_json();
    assert_eq!(json["starting_balance"]["value"], 1000.0);
    assert_eq!(json["starting_balance"]["source"], "default");
    assert_eq!(json["iterations"]["value"], 50_000);
    assert_eq!(json["tie_share"]["value"], "exact");
    assert!(json["seed"]["value"].is_null());
}

#[test]
#[serial]
fn file_values_are_tagged_file() {
    clear_env();
    let f = config_file("starting_balance = 250.0\niterations = 4000\ntie_share = \"half\"\n");
    set_env("HOLDEX_CONFIG", f.path().to_str().unwrap());

    let resolved = config::load_with_sources().unwrap();
    assert_eq!(resolved.config.starting_balance, 250.0);
    assert_eq!(resolved.config.iterations, 4000);
    assert_eq!(resolved.config.tie_share, TieShare::Half);
    assert_eq!(resolved.sources.iterations, ValueSource::File);
    assert_eq!(resolved.sources.seed, ValueSource::Default);
    clear_env();
}

#[test]
#[serial]
fn env_overrides_file() {
    clear_env();
    let f = config_file("seed = \"from-file\"\nthreads = 2\n");
    set_env("HOLDEX_CONFIG", f.path().to_str().unwrap());
    set_env("HOLDEX_SEED", "from-env");
    set_env("HOLDEX_TIE_SHARE", "HALF");

    let json = cfg_json();
    assert_eq!(json["seed"]["value"], "from-env");
    assert_eq!(json["seed"]["source"], "env");
    assert_eq!(json["threads"]["value"], 2);
    assert_eq!(json["threads"]["source"], "file");
    assert_eq!(json["tie_share"]["value"], "half");
    clear_env();
}

#[test]
#[serial]
fn bom_prefixed_file_parses() {
    clear_env();
    let f = config_file("\u{feff}iterations = 1500\n");
    set_env("HOLDEX_CONFIG", f.path().to_str().unwrap());
    assert_eq!(config::load().unwrap().iterations, 1500);
    clear_env();
}

#[test]
#[serial]
fn invalid_values_fail_with_exit_two() {
    clear_env();
    set_env("HOLDEX_ITERATIONS", "10");
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run(["holdex", "cfg"], &mut out, &mut err);
    assert_eq!(code, 2);
    let err = String::from_utf8(err).unwrap();
    assert!(err.contains("iterations must be within 1000..=200000"), "{err}");

    set_env("HOLDEX_ITERATIONS", "lots");
    assert!(config::load().is_err());
    clear_env();
}

#[test]
#[serial]
fn missing_file_is_config_error() {
    clear_env();
    set_env("HOLDEX_CONFIG", "/nonexistent/holdex.toml");
    let e = config::load().unwrap_err();
    assert!(e.to_string().starts_with("cannot read config file"));
    clear_env();
}

#[test]
#[serial]
fn malformed_toml_is_config_error() {
    clear_env();
    let f = config_file("iterations = = 3\n");
    set_env("HOLDEX_CONFIG", f.path().to_str().unwrap());
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run(["holdex", "equity", "--hands", "AsKs QdQh 7c7d 2h3h"], &mut out, &mut err);
    assert_eq!(code, 2);
    assert!(String::from_utf8(err)
        .unwrap()
        .starts_with("Error: Configuration error: cannot parse config file"));
    clear_env();
}

#[test]
#[serial]
fn configured_seed_drives_equity() {
    clear_env();
    set_env("HOLDEX_ITERATIONS", "1000");
    set_env("HOLDEX_SEED", "pinned");
    let args = ["holdex", "equity", "--hands", "AsKs QdQh 7c7d 2h3h"];
    let mut a = Vec::new();
    let mut b = Vec::new();
    let mut err = Vec::new();
    assert_eq!(run(args, &mut a, &mut err), 0);
    let explicit = [
        "holdex", "equity", "--hands", "AsKs QdQh 7c7d 2h3h", "--seed", "pinned",
    ];
    assert_eq!(run(explicit, &mut b, &mut err), 0);
    assert_eq!(a, b);
    clear_env();
}
