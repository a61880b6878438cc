pub mod forms;
pub mod generate;
pub mod init;
pub mod kinds;
pub mod publish;
pub mod stats;
pub mod submit;

pub use forms::{create, list, show, CreateArgs, ShowArgs};
pub use generate::{generate, GenerateArgs};
pub use init::{init, InitArgs};
pub use kinds::kinds;
pub use publish::{publish, PublishArgs};
pub use stats::{stats, submissions, StatsArgs, SubmissionsArgs};
pub use submit::{submit, SubmitArgs};
