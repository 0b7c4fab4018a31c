use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::db::{Database, NewSnippet, Snippet, SnippetStatus};
use crate::error::{AppError, AppResult};
use crate::utils::tags::normalize_tags;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoSelection,
    Editing(i64),
}

/// Raw, user-entered values for every editable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetFields {
    pub title: String,
    pub language: String,
    pub tags: String,
    pub status: String,
    pub code: String,
    pub notes: String,
}

impl Default for SnippetFields {
    fn default() -> Self {
        Self {
            title: String::new(),
            language: String::new(),
            tags: String::new(),
            status: SnippetStatus::default().to_string(),
            code: String::new(),
            notes: String::new(),
        }
    }
}

impl From<&Snippet> for SnippetFields {
    fn from(snippet: &Snippet) -> Self {
        Self {
            title: snippet.title.clone(),
            language: snippet.language.clone(),
            tags: snippet.tags.clone(),
            status: snippet.status.to_string(),
            code: snippet.code.clone(),
            notes: snippet.notes.clone(),
        }
    }
}

struct ValidFields {
    title: String,
    language: String,
    tags: String,
    status: SnippetStatus,
    code: String,
    notes: String,
}

impl ValidFields {
    fn as_new(&self) -> NewSnippet<'_> {
        NewSnippet {
            title: &self.title,
            language: &self.language,
            tags: &self.tags,
            status: self.status,
            code: &self.code,
            notes: &self.notes,
        }
    }
}

pub struct EditorSession {
    db: Arc<Database>,
    state: SessionState,
    fields: SnippetFields,
}

impl EditorSession {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            state: SessionState::NoSelection,
            fields: SnippetFields::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn selected_id(&self) -> Option<i64> {
        match self.state {
            SessionState::Editing(id) => Some(id),
            SessionState::NoSelection => None,
        }
    }

    pub fn fields(&self) -> &SnippetFields {
        &self.fields
    }

    pub fn code(&self) -> &str {
        &self.fields.code
    }

    pub fn db(&self) -> &Arc<Database> {
        &self.db
    }

    pub fn start_new(&mut self) {
        self.state = SessionState::NoSelection;
        self.fields = SnippetFields::default();
    }

    /// Loads `id` as the working record. State is left untouched on failure.
    pub fn select(&mut self, id: i64) -> AppResult<Snippet> {
        let snippet = self.db.get(id)?.ok_or_else(|| {
            debug!(id, "selected snippet no longer exists");
            AppError::NotFound(id)
        })?;
        self.state = SessionState::Editing(id);
        self.fields = SnippetFields::from(&snippet);
        Ok(snippet)
    }

    /// Validates, normalizes and writes `fields`, inserting when nothing is
    /// selected and replacing the selected record otherwise.
    pub fn save(&mut self, fields: SnippetFields) -> AppResult<Snippet> {
        let valid = validate(&fields)?;

        let id = match self.state {
            SessionState::NoSelection => {
                let id = self.db.insert(valid.as_new())?;
                info!(id, "created snippet");
                id
            }
            SessionState::Editing(id) => {
                if !self.db.update(id, valid.as_new())? {
                    warn!(id, "save targeted a snippet that no longer exists");
                    return Err(AppError::NotFound(id));
                }
                info!(id, "updated snippet");
                id
            }
        };

        let stored = self.db.get(id)?.ok_or(AppError::NotFound(id))?;
        self.state = SessionState::Editing(id);
        self.fields = SnippetFields::from(&stored);
        Ok(stored)
    }

    /// Deletes the selected snippet. Returns the removed id, or `None` when
    /// nothing was selected.
    pub fn delete(&mut self) -> AppResult<Option<i64>> {
        let Some(id) = self.selected_id() else {
            return Ok(None);
        };
        self.db.delete(id)?;
        info!(id, "deleted snippet");
        self.start_new();
        Ok(Some(id))
    }
}

fn validate(fields: &SnippetFields) -> AppResult<ValidFields> {
    let title = fields.title.trim();
    let language = fields.language.trim();
    let code = fields.code.trim();
    let tags = normalize_tags(&fields.tags);

    let missing: Vec<&'static str> = [
        ("title", title.is_empty()),
        ("language", language.is_empty()),
        ("tags", tags.is_empty()),
        ("code", code.is_empty()),
    ]
    .into_iter()
    .filter_map(|(name, empty)| empty.then_some(name))
    .collect();
    if !missing.is_empty() {
        return Err(AppError::Validation { missing });
    }

    let status = match fields.status.trim() {
        "" => SnippetStatus::default(),
        other => other.parse::<SnippetStatus>()?,
    };

    Ok(ValidFields {
        title: title.to_string(),
        language: language.to_string(),
        tags,
        status,
        code: code.to_string(),
        notes: fields.notes.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::*;

    fn session() -> EditorSession {
        EditorSession::new(Arc::new(Database::new_in_memory().expect("db init")))
    }

    fn fields(title: &str, language: &str, tags: &str, status: &str, code: &str) -> SnippetFields {
        SnippetFields {
            title: title.to_string(),
            language: language.to_string(),
            tags: tags.to_string(),
            status: status.to_string(),
            code: code.to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn new_session_has_no_selection() {
        let session = session();
        assert_eq!(session.state(), SessionState::NoSelection);
        assert_eq!(session.selected_id(), None);
        assert_eq!(session.fields(), &SnippetFields::default());
        assert_eq!(session.fields().status, "draft");
    }

    #[test]
    fn save_in_new_mode_inserts_and_selects() {
        let mut session = session();
        let stored = session
            .save(fields("Bin Search", "py", " algo, search ", "draft", "def f(): pass"))
            .expect("save");

        assert_eq!(stored.tags, "algo,search");
        assert_eq!(session.state(), SessionState::Editing(stored.id));
        assert_eq!(session.fields().tags, "algo,search");

        let hits = session.db().search("algo").expect("search");
        assert!(hits.iter().any(|row| row.id == stored.id));
        let hits = session.db().search("ALGO").expect("search upper");
        assert!(hits.iter().any(|row| row.id == stored.id));

        assert_eq!(session.delete().expect("delete"), Some(stored.id));
        assert!(matches!(
            session.select(stored.id),
            Err(AppError::NotFound(id)) if id == stored.id
        ));
    }

    #[test]
    fn save_trims_fields_and_defaults_status() {
        let mut session = session();
        let mut input = fields("  Title  ", " rust ", "a, b , c", "  ", "\n  fn main() {}\n");
        input.notes = "  remember me \n".to_string();

        let stored = session.save(input).expect("save");
        assert_eq!(stored.title, "Title");
        assert_eq!(stored.language, "rust");
        assert_eq!(stored.tags, "a,b,c");
        assert_eq!(stored.status, SnippetStatus::Draft);
        assert_eq!(stored.code, "fn main() {}");
        assert_eq!(stored.notes, "remember me");
    }

    #[test]
    fn each_missing_required_field_is_rejected_without_write() {
        let cases = [
            ("title", fields(" ", "py", "a", "draft", "x")),
            ("language", fields("t", "", "a", "draft", "x")),
            ("tags", fields("t", "py", "  ", "draft", "x")),
            ("tags", fields("t", "py", " , ,", "draft", "x")),
            ("code", fields("t", "py", "a", "draft", "\n\t ")),
        ];

        for (field, input) in cases {
            let mut session = session();
            match session.save(input) {
                Err(AppError::Validation { missing }) => assert_eq!(missing, vec![field]),
                other => panic!("expected validation error for {field}, got {other:?}"),
            }
            assert_eq!(session.db().count().expect("count"), 0);
            assert_eq!(session.state(), SessionState::NoSelection);
        }
    }

    #[test]
    fn validation_reports_all_missing_fields() {
        let mut session = session();
        let err = session.save(SnippetFields::default()).expect_err("must fail");
        match err {
            AppError::Validation { missing } => {
                assert_eq!(missing, vec!["title", "language", "tags", "code"])
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        let mut session = session();
        let err = session
            .save(fields("t", "py", "a", "shipped", "x"))
            .expect_err("must fail");
        assert!(matches!(err, AppError::InvalidStatus(_)));
        assert_eq!(session.db().count().expect("count"), 0);
    }

    #[test]
    fn save_while_editing_updates_in_place() {
        let mut session = session();
        let created = session
            .save(fields("v1", "py", "a", "draft", "x"))
            .expect("create");
        thread::sleep(Duration::from_millis(5));

        let updated = session
            .save(fields("v2", "py", "a,b", "tested", "y"))
            .expect("update");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "v2");
        assert_eq!(updated.status, SnippetStatus::Tested);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(session.state(), SessionState::Editing(created.id));
        assert_eq!(session.db().count().expect("count"), 1);
    }

    #[test]
    fn reselect_and_resave_does_not_drift() {
        let mut session = session();
        let created = session
            .save(fields("t", "py", " x ,, y ", "prod", "code"))
            .expect("create");

        session.start_new();
        session.select(created.id).expect("select");
        let loaded = session.fields().clone();
        let resaved = session.save(loaded).expect("resave");

        assert_eq!(resaved.tags, created.tags);
        assert_eq!(resaved.title, created.title);
        assert_eq!(resaved.status, created.status);
        assert_eq!(resaved.code, created.code);
    }

    #[test]
    fn select_loads_fields_and_unknown_id_keeps_state() {
        let mut session = session();
        let created = session
            .save(fields("keep", "go", "a", "tested", "x"))
            .expect("create");
        session.start_new();

        let loaded = session.select(created.id).expect("select");
        assert_eq!(loaded.id, created.id);
        assert_eq!(session.fields().language, "go");
        assert_eq!(session.fields().status, "tested");
        assert_eq!(session.code(), "x");

        assert!(matches!(session.select(999), Err(AppError::NotFound(999))));
        assert_eq!(session.state(), SessionState::Editing(created.id));
    }

    #[test]
    fn saving_a_vanished_record_surfaces_not_found() {
        let mut session = session();
        let created = session
            .save(fields("t", "py", "a", "draft", "x"))
            .expect("create");
        session.db().delete(created.id).expect("delete behind session");

        let err = session
            .save(fields("t2", "py", "a", "draft", "x"))
            .expect_err("must fail");
        assert!(matches!(err, AppError::NotFound(id) if id == created.id));
        assert_eq!(session.db().count().expect("count"), 0);
        assert_eq!(session.state(), SessionState::Editing(created.id));
    }

    #[test]
    fn delete_without_selection_is_noop() {
        let mut session = session();
        session
            .save(fields("t", "py", "a", "draft", "x"))
            .expect("create");
        session.start_new();

        assert_eq!(session.delete().expect("delete"), None);
        assert_eq!(session.db().count().expect("count"), 1);
    }

    #[test]
    fn delete_resets_to_new_mode() {
        let mut session = session();
        session
            .save(fields("t", "py", "a", "draft", "x"))
            .expect("create");

        session.delete().expect("delete");
        assert_eq!(session.state(), SessionState::NoSelection);
        assert_eq!(session.fields(), &SnippetFields::default());
        assert_eq!(session.db().count().expect("count"), 0);
    }

    #[test]
    fn start_new_clears_working_values() {
        let mut session = session();
        session
            .save(fields("t", "py", "a", "prod", "x"))
            .expect("create");

        session.start_new();
        assert_eq!(session.selected_id(), None);
        assert_eq!(session.fields(), &SnippetFields::default());

        let second = session
            .save(fields("second", "py", "b", "", "y"))
            .expect("insert second");
        assert_eq!(session.db().count().expect("count"), 2);
        assert_eq!(session.selected_id(), Some(second.id));
    }
}
