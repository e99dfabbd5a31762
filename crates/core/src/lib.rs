pub mod collab;
pub mod error;
pub mod history;
pub mod location;
pub mod orchestrator;
pub mod session;
pub mod source;
pub mod start_node;
pub mod validate;

mod runtime;
#[cfg(test)]
mod testing;

pub use collab::{BoxError, ContentSource, DialogueRuntime, ValidationRequest, Validator};
pub use error::{FetchError, LoadError};
pub use history::RecentFiles;
pub use location::{display_name, picker_start_dir, recent_label, script_name, to_file_uri};
pub use orchestrator::{
    LoadOrchestrator, LoadReport, LoadResult, OrchestratorOptions, SharedOrchestrator, Toggle,
};
pub use session::{SessionState, SessionView};
pub use source::FileSource;
pub use start_node::select_start_node;
pub use validate::{LintValidator, ValidationReport, analyse};

pub use weaver_prefs::{FilePrefs, MemoryPrefs, PreferenceStore, PrefsError};
pub use weaver_runner::{DialogueRunner, Status};
