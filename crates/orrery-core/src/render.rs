use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::panel::PanelView;
use crate::world::World;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = match color_cfg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => true,
            "off" | "no" | "false" | "0" => false,
            other => return Err(anyhow!("invalid color setting: {other}")),
        };

        Ok(Self { color })
    }

    /// Renders the side panel: title, one row per task with its checkbox and
    /// row actions, nested subtask rows, and the trailing add-task action.
    #[tracing::instrument(skip(self, view))]
    pub fn print_panel(&mut self, view: &PanelView) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        writeln!(out, "== {} ==", self.paint(&view.title, "36"))?;

        let name_width = view
            .rows
            .iter()
            .map(|row| UnicodeWidthStr::width(row.name.as_str()))
            .max()
            .unwrap_or(0);

        for row in &view.rows {
            let padding = name_width.saturating_sub(UnicodeWidthStr::width(row.name.as_str()));
            let label = if row.done {
                self.paint(&row.name, "32")
            } else {
                row.name.clone()
            };
            writeln!(
                out,
                " {} {}{}  (Start | +Subtask)",
                checkbox(row.done),
                label,
                " ".repeat(padding)
            )?;

            for subtask in &row.subtasks {
                let title = if subtask.done {
                    self.paint(&subtask.title, "32")
                } else {
                    subtask.title.clone()
                };
                writeln!(out, "     {} {}", checkbox(subtask.done), title)?;
            }
        }

        writeln!(out, " (Add Task)")?;
        Ok(())
    }

    /// One row per category: name, kind, done count and the task names in
    /// display order.
    #[tracing::instrument(skip(self, world))]
    pub fn print_overview(&mut self, world: &World) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        let headers = ["Category", "Kind", "Done", "Tasks"];

        let mut rows = Vec::with_capacity(world.categories().len());
        for category in world.categories() {
            let name = self.paint(&category.name, "36");
            let done = format!("{}/{}", category.done_count(), category.tasks.len());
            let tasks = category
                .tasks
                .iter()
                .map(|task| task.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");

            rows.push(vec![name, category.kind.clone(), done, tasks]);
        }

        write_table(&mut out, &headers, rows)?;
        Ok(())
    }

    pub fn print_timer(&mut self, text: &str) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", self.paint(text, "36"))?;
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn checkbox(done: bool) -> &'static str {
    if done { "[x]" } else { "[ ]" }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: &[&str],
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(*header));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for idx in 0..column_count {
        write!(writer, "{:-<width$} ", "", width = widths[idx])?;
    }
    writeln!(writer)?;

    for row in rows {
        for idx in 0..column_count {
            let cell = &row[idx];
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
