//! Presentation concerns shared by the editor and the message renderer.

pub mod theme;
