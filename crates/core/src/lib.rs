mod apply;
mod config;
mod creator;
mod entry;
mod namer;
mod planner;
mod rules;
mod selector;

pub const DEFAULT_CREATE_COUNT: usize = 10;
pub const DEFAULT_CREATE_EXTENSION: &str = ".txt";
pub const DEFAULT_COUNTER_START: usize = 1;

pub use apply::{execute_plan, BatchOutcome, BatchReport, ExecutionMode, OutcomeStatus};
pub use config::{app_paths, load_config, save_config, AppConfig, AppPaths};
pub use creator::{
    execute_creations, plan_creations, CreateOptions, CreateOutcome, CreatePlan, CreateReport,
};
pub use entry::DirectoryEntry;
pub use namer::destination_name;
pub use planner::{generate_plan, BatchPlan, BatchStats, PlanEntry, PlanOptions};
pub use rules::{compile_pattern, MatchRule, NamingRule, RuleError};
pub use selector::{scan_directory, select_entries};
