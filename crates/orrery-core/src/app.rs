use std::collections::HashMap;

use anyhow::anyhow;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::orbit;
use crate::panel::{self, PanelView};
use crate::picking::{ClickOutcome, PickingCoordinator};
use crate::scene::{PointerNdc, Scene, SphereHandle};
use crate::timer::{Pomodoro, TimerSignal};
use crate::ui::{NoteDraft, UiShell};
use crate::world::{Category, CategoryId, TaskId, World};

/// The three external callback sources plus user pointer input, reconstructed
/// as explicit events. Each one runs to completion before the next; there is
/// no parallelism anywhere in the core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Click(PointerNdc),
    DoubleClick(PointerNdc),
    /// Animation tick; drives kinematics regardless of selection or panel
    /// state.
    Frame,
    /// Externally driven 1-second timer tick.
    TimerTick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMode {
    Pomodoro,
    OwnPace,
}

impl std::str::FromStr for StartMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pomodoro" => Ok(Self::Pomodoro),
            "own-pace" | "own_pace" | "ownpace" => Ok(Self::OwnPace),
            other => Err(anyhow!("unknown start mode: {other}")),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TimerSnapshot {
    pub phase: &'static str,
    pub remaining_seconds: u32,
}

/// JSON-facing session snapshot for an embedding GUI shell.
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub categories: &'a [Category],
    pub selected: Option<CategoryId>,
    pub panel: Option<PanelView>,
    pub timer: TimerSnapshot,
}

/// Coordinating controller: owns the entity graph, the selection, the one
/// pomodoro instance and the entity-to-sphere maps, and applies the
/// interaction policy between them.
pub struct App<S: Scene, U: UiShell> {
    world: World,
    scene: S,
    shell: U,
    picking: PickingCoordinator,
    pomodoro: Pomodoro,
    pomodoro_seconds: u32,
    category_spheres: HashMap<CategoryId, SphereHandle>,
    task_spheres: HashMap<TaskId, SphereHandle>,
    sphere_categories: HashMap<SphereHandle, CategoryId>,
    sphere_tasks: HashMap<SphereHandle, TaskId>,
}

impl<S: Scene, U: UiShell> App<S, U> {
    pub fn new(world: World, scene: S, shell: U, pomodoro_seconds: u32) -> Self {
        let mut app = Self {
            world,
            scene,
            shell,
            picking: PickingCoordinator::new(),
            pomodoro: Pomodoro::new(),
            pomodoro_seconds,
            category_spheres: HashMap::new(),
            task_spheres: HashMap::new(),
            sphere_categories: HashMap::new(),
            sphere_tasks: HashMap::new(),
        };

        let existing: Vec<CategoryId> = app.world.categories().iter().map(|c| c.id).collect();
        for id in existing {
            app.register_category_spheres(id);
        }

        app
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn shell(&self) -> &U {
        &self.shell
    }

    pub fn selected(&self) -> Option<CategoryId> {
        self.picking.selected()
    }

    pub fn pomodoro(&self) -> &Pomodoro {
        &self.pomodoro
    }

    pub fn category_sphere(&self, id: CategoryId) -> Option<SphereHandle> {
        self.category_spheres.get(&id).copied()
    }

    pub fn task_sphere(&self, id: TaskId) -> Option<SphereHandle> {
        self.task_spheres.get(&id).copied()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        let panel = self
            .picking
            .selected()
            .and_then(|id| self.world.category(id))
            .map(panel::project);

        Snapshot {
            categories: self.world.categories(),
            selected: self.picking.selected(),
            panel,
            timer: TimerSnapshot {
                phase: self.pomodoro.phase().as_str(),
                remaining_seconds: self.pomodoro.remaining_seconds(),
            },
        }
    }

    #[instrument(skip(self))]
    pub fn dispatch(&mut self, event: Event) {
        match event {
            Event::Click(pointer) => self.handle_click(pointer),
            Event::DoubleClick(pointer) => self.handle_double_click(pointer),
            Event::Frame => self.frame(),
            Event::TimerTick => self.timer_tick(),
        }
    }

    /// Creates a category plus one task per name and their scene spheres.
    /// Does not touch the panel: a fresh category is not selected yet.
    pub fn add_category(
        &mut self,
        name: &str,
        kind: &str,
        task_names: &[&str],
    ) -> Option<CategoryId> {
        let id = self.world.create_category(name, kind, task_names)?;
        self.register_category_spheres(id);
        Some(id)
    }

    /// Panel "Add Task" control: append a task, then re-synchronize so the
    /// new row appears without another pick.
    pub fn add_task(&mut self, category: CategoryId, name: &str) -> Option<TaskId> {
        let id = self.world.create_task(category, name)?;
        self.register_task_sphere(id);
        self.sync_panel();
        Some(id)
    }

    /// Panel "Add Subtask" control.
    pub fn add_subtask(&mut self, task: TaskId, title: &str) -> bool {
        let added = self.world.add_subtask(task, title);
        if added {
            self.sync_panel();
        }
        added
    }

    /// Panel checkbox for a task row.
    pub fn toggle_task(&mut self, task: TaskId) -> Option<bool> {
        let done = self.world.toggle_task_done(task);
        if done.is_some() {
            self.sync_panel();
        }
        done
    }

    /// Panel checkbox for a subtask row.
    pub fn set_subtask_done(&mut self, task: TaskId, index: usize, done: bool) -> bool {
        let changed = self.world.set_subtask_done(task, index, done);
        if changed {
            self.sync_panel();
        }
        changed
    }

    /// Opens the note-editor modal pre-filled from the selected category.
    /// With nothing selected there is nothing to edit and nothing happens.
    pub fn open_editor(&mut self) -> Option<NoteDraft> {
        let category = self
            .picking
            .selected()
            .and_then(|id| self.world.category(id))?;
        let draft = NoteDraft {
            title: category.name.clone(),
            body: category.note.clone(),
            kind: category.kind.clone(),
        };
        self.shell.show_editor(&draft);
        Some(draft)
    }

    /// Commits the modal draft back into the selected category's name, note
    /// and kind, then re-synchronizes the panel.
    pub fn save_edits(&mut self, draft: &NoteDraft) {
        if let Some(id) = self.picking.selected() {
            self.world
                .edit_category(id, &draft.title, &draft.body, &draft.kind);
            self.sync_panel();
        } else {
            debug!("save with no selection; nothing edited");
        }
        self.shell.hide_editor();
    }

    /// Start action for a task row. The pomodoro is not bound to the task:
    /// starting for another task silently repurposes the one countdown.
    #[instrument(skip(self))]
    pub fn start_task(&mut self, task: TaskId, mode: StartMode) -> bool {
        let Some(task) = self.world.task(task) else {
            debug!("start for unknown task ignored");
            return false;
        };

        match mode {
            StartMode::Pomodoro => {
                debug!(task = %task.name, "starting pomodoro countdown");
                self.pomodoro.start(self.pomodoro_seconds);
            }
            StartMode::OwnPace => {
                self.shell.message("Task started (own pace mode).");
            }
        }
        true
    }

    /// Single click: categories are the only pickable set for selection.
    fn handle_click(&mut self, pointer: PointerNdc) {
        let candidates: Vec<SphereHandle> = self.category_spheres.values().copied().collect();
        let hit = self
            .scene
            .pick(pointer, &candidates)
            .and_then(|handle| self.sphere_categories.get(&handle).copied());

        match self.picking.click(hit) {
            ClickOutcome::Selected(_) => self.sync_panel(),
            ClickOutcome::Deselected(_) => self.shell.hide_panel(),
            ClickOutcome::Ignored => {}
        }
    }

    /// Double click resolves against the full pickable set. A task hit
    /// toggles its done state; the panel refresh is keyed off the currently
    /// selected category, not the task's own category.
    fn handle_double_click(&mut self, pointer: PointerNdc) {
        let candidates: Vec<SphereHandle> = self
            .category_spheres
            .values()
            .chain(self.task_spheres.values())
            .copied()
            .collect();

        let Some(handle) = self.scene.pick(pointer, &candidates) else {
            debug!("double-click miss");
            return;
        };
        let Some(task) = self.sphere_tasks.get(&handle).copied() else {
            debug!("double-click hit a non-task object");
            return;
        };

        self.world.toggle_task_done(task);
        self.sync_panel();
    }

    /// Kinematics tick: advance every orbit, push positions and done/pending
    /// colors to the scene. Runs whether or not anything is selected.
    fn frame(&mut self) {
        orbit::advance(&mut self.world);

        for category in self.world.categories() {
            for task in &category.tasks {
                let Some(handle) = self.task_spheres.get(&task.id).copied() else {
                    continue;
                };
                self.scene
                    .set_position(handle, orbit::task_position(category.position, &task.orbit));
                self.scene.set_color(handle, orbit::task_color(task.done));
            }
        }
    }

    fn timer_tick(&mut self) {
        match self.pomodoro.tick() {
            TimerSignal::Silent => {}
            TimerSignal::Display(clock) => {
                self.shell.show_timer(&format!("Pomodoro: {clock}"));
            }
            TimerSignal::Completed => {
                self.shell.hide_timer();
                self.shell.play_alert();
                self.shell.message("Pomodoro complete! Take a break.");
                self.pomodoro.acknowledge();
            }
        }
    }

    /// Re-derives the panel from the current selection. No selection means a
    /// hidden panel, not an error.
    pub fn sync_panel(&mut self) {
        match self
            .picking
            .selected()
            .and_then(|id| self.world.category(id))
        {
            Some(category) => {
                let view = panel::project(category);
                self.shell.show_panel(&view);
            }
            None => self.shell.hide_panel(),
        }
    }

    fn register_category_spheres(&mut self, id: CategoryId) {
        let Some(category) = self.world.category(id) else {
            return;
        };
        let position = category.position;
        let task_ids: Vec<TaskId> = category.tasks.iter().map(|task| task.id).collect();

        let handle = self
            .scene
            .create_sphere(orbit::CATEGORY_SPHERE_RADIUS, orbit::CATEGORY_COLOR);
        self.scene.set_position(handle, position);
        self.category_spheres.insert(id, handle);
        self.sphere_categories.insert(handle, id);

        for task in task_ids {
            self.register_task_sphere(task);
        }
    }

    fn register_task_sphere(&mut self, id: TaskId) {
        let Some(task) = self.world.task(id) else {
            return;
        };
        let Some(center) = self.world.category(task.category).map(|c| c.position) else {
            return;
        };
        let position = orbit::task_position(center, &task.orbit);

        let handle = self
            .scene
            .create_sphere(orbit::TASK_SPHERE_RADIUS, orbit::TASK_PENDING_COLOR);
        self.scene.set_position(handle, position);
        self.task_spheres.insert(id, handle);
        self.sphere_tasks.insert(handle, id);
    }
}
