//! # proclink-domain
//!
//! Pure domain model for proclink, a daemon that links the presence of an
//! OS process to the power state of a hub-controlled entity.
//!
//! ## Responsibilities
//! - Foundational types: timestamps, error conventions, the hub entity reference
//! - Define **presence samples** (one boolean observation per poll tick)
//! - Define the **monitor state machine** (`Unknown` / `Running` /
//!   `GraceWindow` / `Stopped`) and its pure transition function, including
//!   the debounce grace window that suppresses off/on flicker
//! - Define **actuator commands** (turn the target entity on or off)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod command;
pub mod entity;
pub mod error;
pub mod monitor;
pub mod presence;
pub mod time;
