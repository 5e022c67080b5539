use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;

use anyhow::{Context, anyhow};
use tracing::{debug, info, instrument};

use crate::app::{App, Event, StartMode};
use crate::orbit;
use crate::render::Renderer;
use crate::scene::{FlatScene, PointerNdc, Scene, project_flat};
use crate::ui::{TerminalShell, UiShell};
use crate::world::TaskId;

pub fn known_command_names() -> Vec<&'static str> {
    vec![
        "add",
        "click",
        "dblclick",
        "task",
        "sub",
        "check",
        "uncheck",
        "start",
        "edit",
        "panel",
        "show",
        "tick",
        "timer-tick",
        "export",
        "help",
        "quit",
        "exit",
    ]
}

pub fn expand_command_abbrev<'a>(token: &'a str, known: &[&'a str]) -> Option<&'a str> {
    if known.contains(&token) {
        return Some(token);
    }

    let mut matches = known.iter().copied().filter(|name| name.starts_with(token));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

/// Drives one session over a script file or the interactive prompt. Script
/// errors fail fast; interactive errors are reported and the prompt
/// continues.
#[instrument(skip(app, renderer))]
pub fn run_session(
    app: &mut App<FlatScene, TerminalShell>,
    renderer: &mut Renderer,
    script: Option<&Path>,
) -> anyhow::Result<()> {
    if let Some(path) = script {
        info!(script = %path.display(), "running session script");
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        for line in text.lines() {
            if !dispatch_line(app, renderer, line)? {
                break;
            }
        }
        return Ok(());
    }

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    loop {
        if interactive {
            print!("orrery> ");
            io::stdout().flush().context("failed to flush prompt")?;
        }

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("failed to read input")?;
        if read == 0 {
            break;
        }

        match dispatch_line(app, renderer, &line) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => eprintln!("error: {err:#}"),
        }
    }

    Ok(())
}

/// Parses and runs one command line. Returns `Ok(false)` when the session
/// should end.
pub fn dispatch_line<S: Scene, U: UiShell>(
    app: &mut App<S, U>,
    renderer: &mut Renderer,
    line: &str,
) -> anyhow::Result<bool> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(&first) = tokens.first() else {
        return Ok(true);
    };
    if first.starts_with('#') {
        return Ok(true);
    }

    let known = known_command_names();
    let command = expand_command_abbrev(first, &known)
        .ok_or_else(|| anyhow!("unknown or ambiguous command: {first}"))?;
    let args = &tokens[1..];

    debug!(command, ?args, "dispatching command");

    match command {
        "add" => cmd_add(app, args),
        "click" => cmd_click(app, args),
        "dblclick" => cmd_dblclick(app, args),
        "task" => cmd_task(app, args),
        "sub" => cmd_sub(app, args),
        "check" => cmd_set_subtask(app, args, true),
        "uncheck" => cmd_set_subtask(app, args, false),
        "start" => cmd_start(app, args),
        "edit" => cmd_edit(app, args),
        "panel" => {
            app.sync_panel();
            Ok(())
        }
        "show" => renderer.print_overview(app.world()),
        "tick" => cmd_ticks(app, args, Event::Frame),
        "timer-tick" => cmd_ticks(app, args, Event::TimerTick),
        "export" => cmd_export(app),
        "help" => {
            println!("commands: {}", known.join(" "));
            Ok(())
        }
        "quit" | "exit" => return Ok(false),
        other => Err(anyhow!("unhandled command: {other}")),
    }?;

    Ok(true)
}

fn cmd_add<S: Scene, U: UiShell>(app: &mut App<S, U>, args: &[&str]) -> anyhow::Result<()> {
    let Some((&name, rest)) = args.split_first() else {
        return Err(anyhow!("add requires a category name"));
    };
    let csv = rest.join(" ");
    let task_names: Vec<&str> = csv
        .split(',')
        .map(str::trim)
        .filter(|task| !task.is_empty())
        .collect();

    if let Some(id) = app.add_category(name, "category", &task_names) {
        let count = app
            .world()
            .category(id)
            .map(|category| category.tasks.len())
            .unwrap_or(0);
        println!("Created category {name} ({count} task(s)).");
    }
    Ok(())
}

fn cmd_click<S: Scene, U: UiShell>(app: &mut App<S, U>, args: &[&str]) -> anyhow::Result<()> {
    let pointer = match parse_pointer(args) {
        Some(pointer) => pointer,
        None => category_pointer(app, &args.join(" "))?,
    };
    app.dispatch(Event::Click(pointer));
    Ok(())
}

fn cmd_dblclick<S: Scene, U: UiShell>(app: &mut App<S, U>, args: &[&str]) -> anyhow::Result<()> {
    let pointer = match parse_pointer(args) {
        Some(pointer) => pointer,
        None => task_pointer(app, &args.join(" "))?,
    };
    app.dispatch(Event::DoubleClick(pointer));
    Ok(())
}

fn cmd_task<S: Scene, U: UiShell>(app: &mut App<S, U>, args: &[&str]) -> anyhow::Result<()> {
    if args.is_empty() {
        return Err(anyhow!("task requires a name"));
    }
    let Some(category) = app.selected() else {
        debug!("task command with no selection; nothing added");
        return Ok(());
    };

    let name = args.join(" ");
    if app.add_task(category, &name).is_some() {
        println!("Created task {name}.");
    }
    Ok(())
}

fn cmd_sub<S: Scene, U: UiShell>(app: &mut App<S, U>, args: &[&str]) -> anyhow::Result<()> {
    let Some((&task_name, title_parts)) = args.split_first() else {
        return Err(anyhow!("sub requires a task name and a title"));
    };
    if title_parts.is_empty() {
        return Err(anyhow!("sub requires a subtask title"));
    }

    let task = resolve_task(app, task_name)?;
    if app.add_subtask(task, &title_parts.join(" ")) {
        println!("Added subtask to {task_name}.");
    }
    Ok(())
}

fn cmd_set_subtask<S: Scene, U: UiShell>(
    app: &mut App<S, U>,
    args: &[&str],
    done: bool,
) -> anyhow::Result<()> {
    let (task_name, index) = match args {
        &[task_name, index] => (task_name, index),
        _ => return Err(anyhow!("expected: <task> <subtask-number>")),
    };
    let index: usize = index
        .parse::<usize>()
        .ok()
        .filter(|idx| *idx > 0)
        .ok_or_else(|| anyhow!("subtask number must be a positive integer"))?;

    let task = resolve_task(app, task_name)?;
    app.set_subtask_done(task, index - 1, done);
    Ok(())
}

fn cmd_start<S: Scene, U: UiShell>(app: &mut App<S, U>, args: &[&str]) -> anyhow::Result<()> {
    let Some((&task_name, rest)) = args.split_first() else {
        return Err(anyhow!("start requires a task name"));
    };
    let mode = match rest {
        [] => StartMode::Pomodoro,
        [mode] => mode.parse::<StartMode>()?,
        _ => return Err(anyhow!("expected: start <task> [pomodoro|own-pace]")),
    };

    let task = resolve_task(app, task_name)?;
    if app.start_task(task, mode) && mode == StartMode::Pomodoro {
        println!("Started {task_name}.");
    }
    Ok(())
}

fn cmd_edit<S: Scene, U: UiShell>(app: &mut App<S, U>, args: &[&str]) -> anyhow::Result<()> {
    let Some(mut draft) = app.open_editor() else {
        debug!("edit with no selection; nothing to do");
        return Ok(());
    };

    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {arg}"))?;
        match key {
            "name" | "title" => draft.title = value.to_string(),
            "note" | "body" => draft.body = value.to_string(),
            "kind" | "type" => draft.kind = value.to_string(),
            other => return Err(anyhow!("unknown edit field: {other}")),
        }
    }

    app.save_edits(&draft);
    println!("Saved.");
    Ok(())
}

fn cmd_ticks<S: Scene, U: UiShell>(
    app: &mut App<S, U>,
    args: &[&str],
    event: Event,
) -> anyhow::Result<()> {
    let count = match args {
        [] => 1,
        [count] => count
            .parse::<u32>()
            .with_context(|| format!("invalid tick count: {count}"))?,
        _ => return Err(anyhow!("expected at most one tick count")),
    };

    for _ in 0..count {
        app.dispatch(event);
    }
    Ok(())
}

fn cmd_export<S: Scene, U: UiShell>(app: &mut App<S, U>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&app.snapshot())
        .context("failed to serialize session snapshot")?;
    println!("{json}");
    Ok(())
}

fn parse_pointer(args: &[&str]) -> Option<PointerNdc> {
    match args {
        [x, y] => Some(PointerNdc {
            x: x.parse::<f64>().ok()?,
            y: y.parse::<f64>().ok()?,
        }),
        _ => None,
    }
}

/// Synthesizes the pointer position over a category in the flat top-down
/// projection, so name-based clicks still travel the full pick path.
fn category_pointer<S: Scene, U: UiShell>(
    app: &App<S, U>,
    name: &str,
) -> anyhow::Result<PointerNdc> {
    let category = app
        .world()
        .category_by_name(name)
        .ok_or_else(|| anyhow!("no such category: {name}"))?;
    Ok(project_flat(category.position))
}

fn task_pointer<S: Scene, U: UiShell>(app: &App<S, U>, name: &str) -> anyhow::Result<PointerNdc> {
    let task = app
        .world()
        .task_by_name(name)
        .ok_or_else(|| anyhow!("no such task: {name}"))?;
    let center = app
        .world()
        .category(task.category)
        .map(|category| category.position)
        .ok_or_else(|| anyhow!("task {name} has no owning category"))?;
    Ok(project_flat(orbit::task_position(center, &task.orbit)))
}

fn resolve_task<S: Scene, U: UiShell>(app: &App<S, U>, name: &str) -> anyhow::Result<TaskId> {
    app.world()
        .task_by_name(name)
        .map(|task| task.id)
        .ok_or_else(|| anyhow!("no such task: {name}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviations_expand_unambiguously() {
        let known = known_command_names();
        assert_eq!(expand_command_abbrev("pa", &known), Some("panel"));
        assert_eq!(expand_command_abbrev("dbl", &known), Some("dblclick"));
        // "t" could be task, tick or timer-tick.
        assert_eq!(expand_command_abbrev("t", &known), None);
        assert_eq!(expand_command_abbrev("task", &known), Some("task"));
    }

    #[test]
    fn pointer_args_parse_as_coordinates() {
        let pointer = parse_pointer(&["0.25", "-0.5"]).expect("pointer");
        assert!((pointer.x - 0.25).abs() < 1e-12);
        assert!((pointer.y + 0.5).abs() < 1e-12);

        assert!(parse_pointer(&["Health"]).is_none());
        assert!(parse_pointer(&["a", "b"]).is_none());
    }
}
