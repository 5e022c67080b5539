use serde::Serialize;

use crate::world::{Category, TaskId};

/// Display tree for the side panel: a pure projection of one category's
/// subtree. Structurally comparable so idempotence is checkable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelView {
    pub title: String,
    pub rows: Vec<TaskRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    pub task: TaskId,
    pub name: String,
    pub done: bool,
    pub subtasks: Vec<SubtaskRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtaskRow {
    pub title: String,
    pub done: bool,
}

/// Projects the selected category into its panel view. Calling this twice
/// with the same category state yields the same structure.
pub fn project(category: &Category) -> PanelView {
    let rows = category
        .tasks
        .iter()
        .map(|task| TaskRow {
            task: task.id,
            name: task.name.clone(),
            done: task.done,
            subtasks: task
                .subtasks
                .iter()
                .map(|subtask| SubtaskRow {
                    title: subtask.title.clone(),
                    done: subtask.done,
                })
                .collect(),
        })
        .collect();

    let title = if category.name.is_empty() {
        "Untitled".to_string()
    } else {
        category.name.clone()
    };

    PanelView { title, rows }
}
