//! Append-only action log.
//!
//! Every record goes to the configured file (opened in append mode, flushed
//! per record) and, optionally, to stderr. Two renderings:
//! - `text`: `<ts> - <LEVEL> - <message>`
//! - `json`: one object per line with `ts`, `seq`, `lvl`, `component`,
//!   `event`, `msg` and a `data` map.

use chrono::Utc;
use serde_json::{json, Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::config::LogConfig;

// =============================================================================
// Log Levels
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl Level {
    pub fn from_env() -> Self {
        std::env::var("LOG_LEVEL")
            .ok()
            .and_then(|v| Level::parse(&v))
            .unwrap_or(Level::Info)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "fatal" => Some(Level::Fatal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

// =============================================================================
// Logger
// =============================================================================

#[derive(Debug)]
pub struct Logger {
    component: &'static str,
    min_level: Level,
    format: LogFormat,
    console: bool,
    seq: AtomicU64,
    file: Mutex<BufWriter<File>>,
}

impl Logger {
    pub fn open(cfg: &LogConfig) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(&cfg.path)?;
        Ok(Self {
            component: "bot",
            min_level: cfg.level,
            format: cfg.format,
            console: cfg.console,
            seq: AtomicU64::new(0),
            file: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn info(&self, event: &str, msg: &str, fields: Map<String, Value>) {
        self.log(Level::Info, event, msg, fields);
    }

    pub fn error(&self, event: &str, msg: &str, fields: Map<String, Value>) {
        self.log(Level::Error, event, msg, fields);
    }

    pub fn log(&self, level: Level, event: &str, msg: &str, fields: Map<String, Value>) {
        if level < self.min_level {
            return;
        }
        let line = match self.format {
            LogFormat::Text => format!("{} - {} - {}", ts_now(), level.as_str().to_uppercase(), msg),
            LogFormat::Json => self.json_record(level, event, msg, fields),
        };
        if let Ok(mut w) = self.file.lock() {
            let _ = writeln!(w, "{}", line);
            let _ = w.flush();
        }
        if self.console {
            eprintln!("{}", line);
        }
    }

    fn json_record(&self, level: Level, event: &str, msg: &str, fields: Map<String, Value>) -> String {
        let mut entry = Map::new();
        entry.insert("ts".to_string(), json!(ts_now()));
        entry.insert("seq".to_string(), json!(self.seq.fetch_add(1, Ordering::SeqCst)));
        entry.insert("lvl".to_string(), json!(level.as_str().to_uppercase()));
        entry.insert("component".to_string(), json!(self.component));
        entry.insert("event".to_string(), json!(event));
        entry.insert("msg".to_string(), json!(msg));
        entry.insert("data".to_string(), Value::Object(fields));
        Value::Object(entry).to_string()
    }
}

/// RFC3339 timestamp with milliseconds
pub fn ts_now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

// =============================================================================
// Helper functions
// =============================================================================

pub fn obj(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut m = Map::new();
    for (k, v) in pairs {
        m.insert(k.to_string(), v.clone());
    }
    m
}

pub fn v_str(s: &str) -> Value {
    Value::String(s.to_string())
}

pub fn v_num(n: f64) -> Value {
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
