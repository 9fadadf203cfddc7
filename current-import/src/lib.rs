//! current-import: task CSV parser, title tag rules, and store importer

pub mod importer;
pub mod tag_rules;
pub mod task_csv;

pub use importer::{import_rows, parse_money, row_to_new_task, ImportReport};
pub use tag_rules::{infer_tags, InferredTags};
pub use task_csv::{parse_tasks_csv, parse_tasks_reader, TaskRow};
