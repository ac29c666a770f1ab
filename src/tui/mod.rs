//! Terminal line-editor building blocks.
//!
//! Bytes flow one way: the event channel feeds the key decoder, keys edit the
//! line buffer (consulting history and completion), and the redraw engine
//! rewrites only the rows the editor owns. [`LineEditor`] ties the pieces
//! together; the rest are public for embedding and testing.

pub mod completion;
pub mod events;
pub mod history;
pub mod input;
pub mod input_buffer;
mod input_layout;
pub mod interrupt;
pub mod keys;
pub mod prompt;
pub mod raw_mode;
pub mod redraw;
pub mod renderer;
pub mod settings;
pub mod term;

pub use completion::{Candidate, Completer};
pub use events::{EditorEvent, InputChannel, PumpEvent};
pub use history::HistoryStore;
pub use input::LineEditor;
pub use input_buffer::LineBuffer;
pub use keys::{KeyDecoder, KeyEvent};
pub use prompt::PromptStyle;
pub use raw_mode::RawModeGuard;
pub use renderer::Renderer;
