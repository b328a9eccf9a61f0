pub mod misc;
pub mod saved;
pub mod search;
pub mod serve;

pub use misc::{generate_completions, list_languages};
pub use saved::{list_saved, remove_saved, save_repo};
pub use search::{search_repos, show_repo, trending_repos};
pub use serve::serve;
