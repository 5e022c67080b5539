mod common;

use common::RecordingShell;
use orrery_core::app::{App, Event};
use orrery_core::orbit;
use orrery_core::panel;
use orrery_core::scene::{FlatScene, PointerNdc, project_flat};
use orrery_core::world::World;

fn new_app() -> App<FlatScene, RecordingShell> {
    App::new(
        World::with_seed(99),
        FlatScene::new(),
        RecordingShell::new(),
        1500,
    )
}

fn category_pointer(app: &App<FlatScene, RecordingShell>, name: &str) -> PointerNdc {
    let category = app.world().category_by_name(name).expect("category");
    project_flat(category.position)
}

fn task_pointer(app: &App<FlatScene, RecordingShell>, name: &str) -> PointerNdc {
    let task = app.world().task_by_name(name).expect("task");
    let center = app
        .world()
        .category(task.category)
        .expect("owning category")
        .position;
    project_flat(orbit::task_position(center, &task.orbit))
}

#[test]
fn click_selects_and_shows_panel() {
    let mut app = new_app();
    app.add_category("Health", "category", &["Run", "Sleep"]);

    let pointer = category_pointer(&app, "Health");
    app.dispatch(Event::Click(pointer));

    assert!(app.selected().is_some());
    assert!(app.shell().panel_visible);
    let view = app.shell().last_panel().expect("panel");
    assert_eq!(view.title, "Health");
    assert_eq!(view.rows.len(), 2);
}

#[test]
fn reclick_always_deselects() {
    let mut app = new_app();
    app.add_category("Health", "category", &["Run"]);
    let pointer = category_pointer(&app, "Health");

    // Any amount of prior click history must not change the rule.
    for _ in 0..3 {
        app.dispatch(Event::Click(pointer));
        assert!(app.selected().is_some());
        app.dispatch(Event::Click(pointer));
        assert!(app.selected().is_none());
        assert!(!app.shell().panel_visible);
    }
}

#[test]
fn clicking_empty_space_keeps_selection() {
    let mut app = new_app();
    app.add_category("Health", "category", &["Run"]);
    let pointer = category_pointer(&app, "Health");
    app.dispatch(Event::Click(pointer));
    let selected = app.selected();

    // Placement spans +-30 on x/z, so nothing projects near the far corner.
    app.dispatch(Event::Click(PointerNdc { x: 0.99, y: 0.99 }));
    assert_eq!(app.selected(), selected);
    assert!(app.shell().panel_visible);
}

#[test]
fn clicking_another_category_switches_selection() {
    let mut app = new_app();
    app.add_category("Alpha", "category", &["One"]);
    app.add_category("Beta", "category", &["Two"]);

    app.dispatch(Event::Click(category_pointer(&app, "Alpha")));
    let alpha = app.selected().expect("alpha selected");

    app.dispatch(Event::Click(category_pointer(&app, "Beta")));
    let beta = app.selected().expect("beta selected");
    assert_ne!(alpha, beta);
    assert_eq!(app.shell().last_panel().expect("panel").title, "Beta");
}

#[test]
fn double_click_toggles_task_and_refreshes_selected_panel() {
    let mut app = new_app();
    app.add_category("Alpha", "category", &["One"]);
    app.add_category("Beta", "category", &["Two"]);

    app.dispatch(Event::Click(category_pointer(&app, "Alpha")));

    // Toggle a task that belongs to the *other* category.
    let pointer = task_pointer(&app, "Two");
    app.dispatch(Event::DoubleClick(pointer));

    let two = app.world().task_by_name("Two").expect("task");
    assert!(two.done);

    // The refresh is keyed off the selection, not the toggled task's owner.
    let view = app.shell().last_panel().expect("panel");
    assert_eq!(view.title, "Alpha");
    assert!(view.rows.iter().all(|row| row.name != "Two"));
}

#[test]
fn double_click_with_no_selection_still_toggles() {
    let mut app = new_app();
    app.add_category("Solo", "category", &["Task"]);

    app.dispatch(Event::DoubleClick(task_pointer(&app, "Task")));

    assert!(app.world().task_by_name("Task").expect("task").done);
    assert!(app.selected().is_none());
    assert!(!app.shell().panel_visible);
}

#[test]
fn double_click_on_category_toggles_nothing() {
    let mut app = new_app();
    app.add_category("Solo", "category", &["Task"]);

    app.dispatch(Event::DoubleClick(category_pointer(&app, "Solo")));

    assert!(!app.world().task_by_name("Task").expect("task").done);
    assert!(app.selected().is_none());
}

#[test]
fn panel_projection_is_idempotent() {
    let mut app = new_app();
    app.add_category("Health", "category", &["Run", "Sleep"]);
    let run = app.world().task_by_name("Run").expect("task").id;
    app.add_subtask(run, "Stretch");

    let category = app.world().category_by_name("Health").expect("category");
    assert_eq!(panel::project(category), panel::project(category));

    app.dispatch(Event::Click(category_pointer(&app, "Health")));
    app.sync_panel();
    let panels = &app.shell().panels;
    assert!(panels.len() >= 2);
    assert_eq!(panels[panels.len() - 1], panels[panels.len() - 2]);
}

#[test]
fn panel_mutations_resync_without_another_pick() {
    let mut app = new_app();
    app.add_category("Health", "category", &["Run"]);
    app.dispatch(Event::Click(category_pointer(&app, "Health")));

    let run = app.world().task_by_name("Run").expect("task").id;
    app.add_subtask(run, "Stretch");
    let view = app.shell().last_panel().expect("panel");
    assert_eq!(view.rows[0].subtasks.len(), 1);
    assert_eq!(view.rows[0].subtasks[0].title, "Stretch");

    let health = app.selected().expect("selected");
    app.add_task(health, "Sleep");
    let view = app.shell().last_panel().expect("panel");
    assert_eq!(view.rows.len(), 2);
    assert_eq!(view.rows[1].name, "Sleep");

    app.toggle_task(run);
    let view = app.shell().last_panel().expect("panel");
    assert!(view.rows[0].done);

    app.set_subtask_done(run, 0, true);
    let view = app.shell().last_panel().expect("panel");
    assert!(view.rows[0].subtasks[0].done);
}

#[test]
fn editor_saves_back_into_selected_category() {
    let mut app = new_app();
    app.add_category("Old", "category", &[]);
    app.dispatch(Event::Click(category_pointer(&app, "Old")));

    let mut draft = app.open_editor().expect("draft");
    assert_eq!(draft.title, "Old");
    assert!(app.shell().editor_visible);

    draft.title = "New".to_string();
    draft.body = "focus notes".to_string();
    draft.kind = "idea".to_string();
    app.save_edits(&draft);

    let id = app.selected().expect("still selected");
    let category = app.world().category(id).expect("category");
    assert_eq!(category.name, "New");
    assert_eq!(category.note, "focus notes");
    assert_eq!(category.kind, "idea");

    assert!(!app.shell().editor_visible);
    assert_eq!(app.shell().last_panel().expect("panel").title, "New");
}

#[test]
fn editor_needs_a_selection() {
    let mut app = new_app();
    app.add_category("Solo", "category", &[]);
    assert!(app.open_editor().is_none());
    assert!(!app.shell().editor_visible);
}

#[test]
fn frame_advances_orbits_and_pushes_scene_updates() {
    let mut app = new_app();
    app.add_category("Health", "category", &["Run"]);

    let before = app.world().task_by_name("Run").expect("task").orbit.angle;
    app.dispatch(Event::Frame);

    let task = app.world().task_by_name("Run").expect("task");
    assert!((task.orbit.angle - (before + task.orbit.speed)).abs() < 1e-12);

    let handle = app.task_sphere(task.id).expect("sphere");
    let center = app
        .world()
        .category(task.category)
        .expect("category")
        .position;
    let expected = orbit::task_position(center, &task.orbit);
    let actual = app.scene().position_of(handle).expect("position");
    assert!((actual.x - expected.x).abs() < 1e-12);
    assert!((actual.y - expected.y).abs() < 1e-12);
    assert!((actual.z - expected.z).abs() < 1e-12);
    assert_eq!(
        app.scene().color_of(handle),
        Some(orbit::TASK_PENDING_COLOR)
    );

    // Kinematics keeps running with nothing selected, and colors follow done.
    app.toggle_task(task.id);
    app.dispatch(Event::Frame);
    assert_eq!(app.scene().color_of(handle), Some(orbit::TASK_DONE_COLOR));
}
