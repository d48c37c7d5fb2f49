//! # econ-core
//!
//! Session core for an economic analysis agent: the state machinery that
//! turns a stream of agent tool calls into a consistent, queryable session
//! snapshot and a structured result.
//!
//! The LLM runtime itself is a collaborator behind the [`backend`] trait;
//! this crate owns everything downstream of it: the action log, the fold
//! that aggregates it, the snapshot it produces, and the projection the
//! caller receives.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use econ_core::{AgentBackend, SessionRunner};
//!
//! # async fn example(backend: Arc<dyn AgentBackend>) {
//! let mut runner = SessionRunner::new(backend);
//!
//! let result = runner.run_turn("Analyze current inflation trends").await;
//! if result.success {
//!     println!("{}", result.response);
//!     if let Some(report) = result.report {
//!         println!("{report}");
//!     }
//! }
//!
//! // Same session, next turn: the agent sees its pending tasks and cache.
//! let _followup = runner.run_turn("Now compare against unemployment").await;
//! # }
//! ```
//!
//! ## Architecture
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`action`] | Action log entries and the closed `ToolEffect` dispatch enum |
//! | [`aggregator`] | The fold: `(Snapshot, ActionLog) → Snapshot`, pure and replayable |
//! | [`state`] | `Snapshot`, `Task`, `VirtualFile`: the session's queryable state |
//! | [`outcome`] | `AnalysisResult`: the JSON-serializable projection returned to callers |
//! | [`runner`] | `SessionRunner`: context rendering, backend invocation, fold, format |
//! | [`backend`] | `AgentBackend` trait: the agent-execution collaborator boundary |
//! | [`fred`] | FRED API client: series summaries, descriptive statistics, comparisons |
//! | [`tool`] | Async tool trait and registry; economic and planning tool sets |
//! | [`error`] | Error types with thiserror: `Backend`, `Series`, `ToolExecution`, etc. |
//!
//! ## State Semantics
//!
//! The fold in [`aggregator`] is the single source of truth for session
//! state. Task ids are unique and monotonic; a task's `completed_at` is set
//! by its first completion and never rewritten; file overwrites keep the
//! original `created_at`; and a failed data fetch never displaces a cached
//! payload. Malformed tool output is absorbed entry by entry, so one bad
//! payload cannot abort a turn's remaining updates.

pub mod action;
pub mod aggregator;
pub mod backend;
pub mod error;
pub mod fred;
pub mod outcome;
pub mod runner;
pub mod state;
pub mod tool;

pub use action::{ActionEntry, ActionLog, ToolEffect};
pub use backend::{AgentBackend, AgentTurn};
pub use error::{EconError, EconResult};
pub use outcome::AnalysisResult;
pub use runner::SessionRunner;
pub use state::{Snapshot, Task, TaskId, TaskStatus, VirtualFile};
