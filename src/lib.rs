//! Diagram editing engine for a personal notes workspace.
//!
//! This crate owns the diagram canvas: the element and connector model, the
//! mutation and undo/redo core that keeps it consistent, and the pointer-driven
//! interaction state machine that turns raw mouse and keyboard events into
//! create, move, resize, connect, and draw operations. The host application
//! feeds events into [`engine::Engine`], replays the display list from
//! [`render`], and persists [`file::DiagramFile`]s however it likes.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Interaction controller and the [`engine::Action`]s it emits |
//! | [`store`] | Model store: elements, connectors, selection, clipboard, history, subscribers |
//! | [`doc`] | Element and connector types, styles, sparse patches |
//! | [`history`] | Bounded linear undo/redo stack of snapshots |
//! | [`input`] | Tools, modifiers, view state, and the gesture state machine |
//! | [`hit`] | Hit-testing and resize-handle geometry |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`geometry`] | Points, rectangles, containment and proximity tests, anchors |
//! | [`render`] | Display-list construction |
//! | [`file`] | Versioned JSON diagram file |
//! | [`config`] | Engine tuning parameters |
//! | [`consts`] | Shared numeric constants (zoom limits, minimum sizes, etc.) |

pub mod camera;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod file;
pub mod geometry;
pub mod history;
pub mod hit;
pub mod input;
pub mod render;
pub mod store;
