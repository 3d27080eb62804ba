pub mod commands;
pub mod handlers;

pub use commands::command_argument_builder;
pub use handlers::{handle_init, handle_search, init_tracing, parse_nsfw_arg, parse_threads_arg};
