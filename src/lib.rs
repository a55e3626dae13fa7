//! Virtual Gree air-conditioner remote.
//!
//! The appliance state lives in [`state`] and only changes through the pure
//! transitions in [`transition`]. [`session`] wraps it with the presentation
//! concerns of a remote (notices, protocol view, AI assist) and
//! [`services::recommend`] turns a free-text request into a suggested
//! setting through one of the providers in [`llm`].

pub mod command;
pub mod llm;
pub mod notice;
pub mod render;
pub mod services;
pub mod session;
pub mod state;
pub mod transition;
