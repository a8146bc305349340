pub mod events;
pub mod handler;

// Re-export the essential types
pub use events::{InputEvent, MapEvent, MapEventKind, TouchEventType, TouchPoint};
pub use handler::{Action, DragState, EventManager, InputHandler, ViewState};
