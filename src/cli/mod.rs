//! # CLI Module
//!
//! User-facing commands of the `monthlywrap` binary.
//!
//! - [`serve`] - runs the OAuth/proxy backend
//! - [`wrap`] - mounts the wrap client against a backend and prints it
//!
//! ## Usage Patterns
//!
//! ```bash
//! monthlywrap serve                              # start the backend
//! monthlywrap wrap --open                        # logged out: open the login page
//! monthlywrap wrap --session <id> --limit 5      # print the top 5
//! monthlywrap wrap --session <id> --interactive  # pick limits from stdin
//! ```
//!
//! Fatal problems (bad configuration, a server that cannot bind) end the
//! process through the crate's `error!` macro; everything else is reported
//! and recovered.

mod serve;
mod wrap;

pub use serve::serve;
pub use wrap::wrap;
