// Editor history store: one undo/redo-tracked CV per session, mirrored to a
// storage slot after every change.

pub mod command;
pub mod handlers;
pub mod history;
pub mod patch;
pub mod persistence;
pub mod registry;
pub mod session;
