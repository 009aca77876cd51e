//! Dashboard state: focus mode, quick note and task list

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Maximum length of the quick note, in characters
pub const NOTE_MAX_CHARS: usize = 500;

/// A to-do list entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub text: String,
    pub completed: bool,
}

/// Task counts shown in the quick stats panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
}

/// Session-local productivity tools
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub focus_mode: bool,
    pub note: String,
    pub tasks: Vec<Task>,
    #[serde(skip)]
    next_task_id: u64,
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            focus_mode: false,
            note: String::new(),
            tasks: Vec::new(),
            next_task_id: 1,
        }
    }

    /// Flip focus mode and return the new value
    pub fn toggle_focus(&mut self) -> bool {
        self.focus_mode = !self.focus_mode;
        self.focus_mode
    }

    /// Replace the quick note
    pub fn set_note(&mut self, text: String) -> Result<()> {
        let len = text.chars().count();
        if len > NOTE_MAX_CHARS {
            return Err(AppError::NoteTooLong {
                len,
                max: NOTE_MAX_CHARS,
            });
        }
        self.note = text;
        Ok(())
    }

    pub fn clear_note(&mut self) {
        self.note.clear();
    }

    pub fn note_len(&self) -> usize {
        self.note.chars().count()
    }

    /// Append a task, trimming surrounding whitespace
    pub fn add_task(&mut self, text: &str) -> Result<Task> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::EmptyTask);
        }
        let task = Task {
            id: self.next_task_id,
            text: text.to_string(),
            completed: false,
        };
        self.next_task_id += 1;
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Flip a task's completion flag
    pub fn toggle_task(&mut self, id: u64) -> Result<Task> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(AppError::TaskNotFound(id))?;
        task.completed = !task.completed;
        Ok(task.clone())
    }

    /// Remove a task and return it
    pub fn delete_task(&mut self, id: u64) -> Result<Task> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(AppError::TaskNotFound(id))?;
        Ok(self.tasks.remove(index))
    }

    pub fn task_stats(&self) -> TaskStats {
        TaskStats {
            total: self.tasks.len(),
            completed: self.tasks.iter().filter(|t| t.completed).count(),
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}
