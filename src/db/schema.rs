pub const SCHEMA_VERSION: i32 = 1;

/// V1: schema version bookkeeping plus the key-value table backing
/// session token, draft content, preferences and client settings.
pub const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS app_settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;
