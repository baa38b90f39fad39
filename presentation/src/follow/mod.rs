//! In-process reader that prints the conversation as it grows

mod console;

pub use console::{ConsoleFollower, FollowStats};
