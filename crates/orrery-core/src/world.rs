use std::fmt;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::scene::Vec3;

pub const DEFAULT_KIND: &str = "category";

/// Stable identity for a category, handed out at creation and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CategoryId(Uuid);

/// Task identity: creation time in microseconds plus a random tie-break so
/// rapid creation within one clock step cannot collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TaskId {
    micros: i64,
    nonce: u32,
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:08x}", self.micros, self.nonce)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Subtask {
    pub title: String,
    pub done: bool,
}

/// Animation parameters for one task. `angle` is mutable tick state; `radius`
/// and `speed` are fixed at creation. The angle is only ever read through
/// trig functions, so it never needs explicit wraparound.
#[derive(Debug, Clone, Serialize)]
pub struct Orbit {
    pub angle: f64,
    pub radius: f64,
    pub speed: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub done: bool,
    pub orbit: Orbit,
    pub subtasks: Vec<Subtask>,
    /// Non-owning back-reference to the owning category, used for position
    /// lookups only.
    pub category: CategoryId,
}

#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub note: String,
    pub kind: String,
    /// Assigned once at creation, immutable thereafter.
    pub position: Vec3,
    pub tasks: Vec<Task>,
}

impl Category {
    pub fn done_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.done).count()
    }
}

/// The entity graph: every category, task and subtask in the session. Owns
/// all of them exclusively; views and the scene reference entities by id.
/// Mutations never trigger a re-render themselves; callers refresh views.
#[derive(Debug)]
pub struct World {
    categories: Vec<Category>,
    rng: StdRng,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            categories: Vec::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic placement and orbits, for tests and scripted demos.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            categories: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn categories_mut(&mut self) -> &mut [Category] {
        &mut self.categories
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.name == name)
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.categories
            .iter()
            .flat_map(|category| category.tasks.iter())
            .find(|task| task.id == id)
    }

    pub fn task_by_name(&self, name: &str) -> Option<&Task> {
        self.categories
            .iter()
            .flat_map(|category| category.tasks.iter())
            .find(|task| task.name == name)
    }

    /// Allocates a category at a random position inside the placement volume
    /// (overlaps are tolerated, not prevented) and one task per supplied
    /// name, preserving order. Blank names are rejected silently.
    #[tracing::instrument(skip(self, task_names))]
    pub fn create_category(
        &mut self,
        name: &str,
        kind: &str,
        task_names: &[&str],
    ) -> Option<CategoryId> {
        let name = name.trim();
        if name.is_empty() {
            warn!("rejecting category with blank name");
            return None;
        }

        let kind = kind.trim();
        let kind = if kind.is_empty() { DEFAULT_KIND } else { kind };

        let id = CategoryId(Uuid::new_v4());
        let position = Vec3::new(
            self.rng.gen_range(-30.0..30.0),
            self.rng.gen_range(-10.0..10.0),
            self.rng.gen_range(-30.0..30.0),
        );

        self.categories.push(Category {
            id,
            name: name.to_string(),
            note: String::new(),
            kind: kind.to_string(),
            position,
            tasks: Vec::new(),
        });
        debug!(category = %name, "created category");

        for task_name in task_names {
            self.create_task(id, task_name);
        }

        Some(id)
    }

    /// Appends a task with a fresh randomized orbit. Blank names are
    /// rejected silently.
    #[tracing::instrument(skip(self))]
    pub fn create_task(&mut self, category: CategoryId, name: &str) -> Option<TaskId> {
        let name = name.trim();
        if name.is_empty() {
            warn!("rejecting task with blank name");
            return None;
        }

        let id = TaskId {
            micros: Utc::now().timestamp_micros(),
            nonce: self.rng.r#gen(),
        };
        let orbit = Orbit {
            angle: self.rng.gen_range(0.0..std::f64::consts::TAU),
            radius: self.rng.gen_range(3.0..5.0),
            speed: self.rng.gen_range(0.01..0.02),
        };

        let Some(owner) = self
            .categories
            .iter_mut()
            .find(|candidate| candidate.id == category)
        else {
            warn!("rejecting task for unknown category");
            return None;
        };

        owner.tasks.push(Task {
            id,
            name: name.to_string(),
            done: false,
            orbit,
            subtasks: Vec::new(),
            category,
        });
        debug!(task = %name, "created task");
        Some(id)
    }

    /// Appends `{title, done: false}` to the task's checklist. Blank titles
    /// are rejected silently.
    #[tracing::instrument(skip(self))]
    pub fn add_subtask(&mut self, task: TaskId, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            warn!("rejecting subtask with blank title");
            return false;
        }

        let Some(task) = self.task_mut(task) else {
            return false;
        };
        task.subtasks.push(Subtask {
            title: title.to_string(),
            done: false,
        });
        true
    }

    /// Flips `done`, returning the new value.
    #[tracing::instrument(skip(self))]
    pub fn toggle_task_done(&mut self, task: TaskId) -> Option<bool> {
        let task = self.task_mut(task)?;
        task.done = !task.done;
        debug!(task = %task.name, done = task.done, "toggled task");
        Some(task.done)
    }

    pub fn set_subtask_done(&mut self, task: TaskId, index: usize, done: bool) -> bool {
        let Some(task) = self.task_mut(task) else {
            return false;
        };
        let Some(subtask) = task.subtasks.get_mut(index) else {
            debug!(index, "no such subtask");
            return false;
        };
        subtask.done = done;
        true
    }

    /// Direct field mutation; the only validation is a non-empty name.
    #[tracing::instrument(skip(self, name, note, kind))]
    pub fn edit_category(&mut self, category: CategoryId, name: &str, note: &str, kind: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            warn!("rejecting category edit with blank name");
            return false;
        }

        let Some(category) = self
            .categories
            .iter_mut()
            .find(|candidate| candidate.id == category)
        else {
            return false;
        };
        category.name = name.to_string();
        category.note = note.to_string();
        category.kind = kind.to_string();
        true
    }

    fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.categories
            .iter_mut()
            .flat_map(|category| category.tasks.iter_mut())
            .find(|task| task.id == id)
    }
}
