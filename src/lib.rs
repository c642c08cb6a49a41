//! promptwiz: a small relay between a browser chat UI and the Gemini
//! `generateContent` API.
//!
//! ```text
//! promptwiz/
//! ├── src/
//! │   ├── lib.rs          # Re-exports
//! │   ├── main.rs         # Server binary
//! │   ├── error.rs        # Error taxonomy
//! │   ├── config.rs       # CLI / env configuration
//! │   ├── request.rs      # Wire types
//! │   ├── template.rs     # Instruction builder
//! │   ├── failover.rs     # Credential pool + sequential failover
//! │   ├── providers/      # Upstream clients (Gemini)
//! │   ├── normalize.rs    # Fence stripping + tolerant parsing
//! │   ├── catalog.rs      # Static lookup tables
//! │   └── server.rs       # axum boundary
//! └── tests/              # Router + upstream integration tests
//! ```
//!
//! Request flow: validate body, render the instruction, try each
//! credential in order, normalize the first usable answer.

pub mod error;
pub mod config;
pub mod request;
pub mod template;
pub mod providers;
pub mod failover;
pub mod normalize;
pub mod catalog;
pub mod server;

pub use error::{Error, Result};
pub use failover::{Credential, CredentialPool};
pub use request::{GenerationRequest, NormalizedPromptSet, PromptVariant};
pub use server::{build_router, AppState};
