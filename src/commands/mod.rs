pub mod args;

use std::fs;
use std::io::{BufRead, Read, Write};

use serde::Serialize;
use tracing::debug;

pub use args::{Cli, Commands, FieldArgs};

use crate::clipboard::{self, ClipboardService};
use crate::db::{Snippet, SnippetSummary};
use crate::error::{AppError, AppResult};
use crate::services::session::{EditorSession, SnippetFields};

const DEFAULT_LANGUAGE: &str = "py";

pub struct CommandContext<'a> {
    pub session: &'a mut EditorSession,
    pub clipboard: &'a dyn ClipboardService,
    pub input: &'a mut dyn BufRead,
    pub out: &'a mut dyn Write,
    pub json: bool,
}

#[derive(Clone, Debug, Serialize)]
struct DeletedPayload {
    id: i64,
}

#[derive(Clone, Debug, Serialize)]
struct CopiedPayload {
    id: i64,
    copied: bool,
}

pub fn execute(command: Commands, ctx: &mut CommandContext<'_>) -> AppResult<()> {
    match command {
        Commands::Search { keyword } => search(ctx, &keyword.join(" ")),
        Commands::Show { id } => show(ctx, id),
        Commands::Add(fields) => add(ctx, fields),
        Commands::Edit { id, fields } => edit(ctx, id, fields),
        Commands::Delete { id, yes } => delete(ctx, id, yes),
        Commands::Copy { id } => copy(ctx, id),
    }
}

fn search(ctx: &mut CommandContext<'_>, keyword: &str) -> AppResult<()> {
    let rows = ctx.session.db().search(keyword)?;
    debug!(keyword, hits = rows.len(), "search");
    if ctx.json {
        return write_json(ctx.out, &rows);
    }
    if rows.is_empty() {
        writeln!(ctx.out, "No snippets found.")?;
        return Ok(());
    }
    write!(ctx.out, "{}", render_table(&rows))?;
    Ok(())
}

fn show(ctx: &mut CommandContext<'_>, id: i64) -> AppResult<()> {
    let snippet = ctx.session.select(id)?;
    if ctx.json {
        return write_json(ctx.out, &snippet);
    }
    write!(ctx.out, "{}", render_snippet(&snippet))?;
    Ok(())
}

fn add(ctx: &mut CommandContext<'_>, args: FieldArgs) -> AppResult<()> {
    ctx.session.start_new();
    let mut fields = SnippetFields {
        language: DEFAULT_LANGUAGE.to_string(),
        ..SnippetFields::default()
    };
    apply_args(&mut fields, args, ctx.input)?;
    let saved = ctx.session.save(fields)?;
    report_saved(ctx, &saved)
}

fn edit(ctx: &mut CommandContext<'_>, id: i64, args: FieldArgs) -> AppResult<()> {
    ctx.session.select(id)?;
    let mut fields = ctx.session.fields().clone();
    apply_args(&mut fields, args, ctx.input)?;
    let saved = ctx.session.save(fields)?;
    report_saved(ctx, &saved)
}

fn delete(ctx: &mut CommandContext<'_>, id: i64, yes: bool) -> AppResult<()> {
    ctx.session.select(id)?;

    if !yes && !confirm(ctx, "Delete this snippet? [y/N] ")? {
        ctx.session.start_new();
        writeln!(ctx.out, "Delete cancelled.")?;
        return Ok(());
    }

    // select() above left the session editing `id`.
    let Some(deleted) = ctx.session.delete()? else {
        return Err(AppError::NotFound(id));
    };
    if ctx.json {
        return write_json(ctx.out, &DeletedPayload { id: deleted });
    }
    writeln!(ctx.out, "Snippet {deleted} deleted.")?;
    Ok(())
}

fn copy(ctx: &mut CommandContext<'_>, id: i64) -> AppResult<()> {
    ctx.session.select(id)?;
    let copied = clipboard::copy_code(ctx.clipboard, ctx.session.code())?;
    if ctx.json {
        return write_json(ctx.out, &CopiedPayload { id, copied });
    }
    if copied {
        writeln!(ctx.out, "Copied code of snippet {id}.")?;
    } else {
        writeln!(ctx.out, "Snippet {id} has no code to copy.")?;
    }
    Ok(())
}

fn report_saved(ctx: &mut CommandContext<'_>, saved: &Snippet) -> AppResult<()> {
    if ctx.json {
        return write_json(ctx.out, saved);
    }
    writeln!(ctx.out, "Snippet saved. (id {})", saved.id)?;
    Ok(())
}

fn confirm(ctx: &mut CommandContext<'_>, prompt: &str) -> AppResult<bool> {
    write!(ctx.out, "{prompt}")?;
    ctx.out.flush()?;
    let mut answer = String::new();
    ctx.input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// Overwrites the fields present in `args`; absent flags keep their current value.
fn apply_args(
    fields: &mut SnippetFields,
    args: FieldArgs,
    input: &mut dyn BufRead,
) -> AppResult<()> {
    let FieldArgs {
        title,
        language,
        tags,
        status,
        code,
        code_file,
        notes,
    } = args;

    if let Some(title) = title {
        fields.title = title;
    }
    if let Some(language) = language {
        fields.language = language;
    }
    if let Some(tags) = tags {
        fields.tags = tags;
    }
    if let Some(status) = status {
        fields.status = status;
    }
    if let Some(notes) = notes {
        fields.notes = notes;
    }

    match (code, code_file) {
        (Some(code), _) => fields.code = code,
        (None, Some(path)) if path.as_os_str() == "-" => {
            let mut code = String::new();
            input.read_to_string(&mut code)?;
            fields.code = code;
        }
        (None, Some(path)) => {
            fields.code = fs::read_to_string(&path)
                .map_err(|source| AppError::ReadFile { path, source })?;
        }
        (None, None) => {}
    }
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> AppResult<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn render_table(rows: &[SnippetSummary]) -> String {
    const HEADERS: [&str; 5] = ["ID", "Title", "Lang", "Tags", "Status"];

    let cells: Vec<[String; 5]> = rows
        .iter()
        .map(|row| {
            [
                row.id.to_string(),
                row.title.clone(),
                row.language.clone(),
                row.tags.clone(),
                row.status.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|header| header.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut table = String::new();
    push_row(&mut table, &HEADERS, &widths);
    for row in &cells {
        push_row(&mut table, row, &widths);
    }
    table
}

fn push_row<S: AsRef<str>>(table: &mut String, cells: &[S], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell.as_ref(), width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    table.push_str(line.trim_end());
    table.push('\n');
}

fn render_snippet(snippet: &Snippet) -> String {
    let mut text = format!(
        "#{} {}\nlanguage: {}\nstatus:   {}\ntags:     {}\ncreated:  {}\nupdated:  {}\n\n{}\n",
        snippet.id,
        snippet.title,
        snippet.language,
        snippet.status,
        snippet.tags,
        snippet.created_at,
        snippet.updated_at,
        snippet.code,
    );
    if !snippet.notes.is_empty() {
        text.push_str(&format!("\nnotes:\n{}\n", snippet.notes));
    }
    text
}
