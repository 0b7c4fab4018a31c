pub const CREATE_SNIPPETS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS snippets (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  title TEXT NOT NULL CHECK (length(title) > 0),
  language TEXT NOT NULL CHECK (length(language) > 0),
  tags TEXT NOT NULL,
  status TEXT NOT NULL DEFAULT 'draft' CHECK (status IN ('draft', 'tested', 'prod')),
  code TEXT NOT NULL CHECK (length(code) > 0),
  notes TEXT,
  created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
  updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
);
"#;

pub const CREATE_INDEX_UPDATED_AT: &str =
    "CREATE INDEX IF NOT EXISTS idx_snippets_updated_at ON snippets(updated_at DESC);";

pub const CURRENT_TIMESTAMP: &str = "strftime('%Y-%m-%d %H:%M:%f', 'now')";
