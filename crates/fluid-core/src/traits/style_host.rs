// # Style Host Trait
//
// Defines the interface to the surface that hosts the live preview
// stylesheet.
//
// ## Purpose
//
// The overlay writes its rules into one rewritable style container. The
// container lives on a host surface (for example a preview frame) that may
// not be reachable yet, so acquiring it can fail without being an error.
//
// ## Implementations
//
// - In-memory: `MemoryStyleHost`
//
// ## Usage
//
// ```rust,ignore
// use fluid_core::StyleHost;
//
// if let Some(mut container) = host.acquire() {
//     container.replace(":root { --fluid-h1: 20px; }");
// }
// ```

/// A rewritable block of CSS text
///
/// Containers are owned by the overlay once acquired and are only touched
/// from the editor's UI flow.
pub trait StyleContainer: Send {
    /// Current CSS text
    fn contents(&self) -> String;

    /// Replace the CSS text
    fn replace(&mut self, css: &str);
}

/// Surface able to provide a style container
///
/// # Behavior
///
/// - `acquire()` returns `None` while the surface is unreachable
/// - Must not call back into the engine: writes never trigger events that
///   re-enter the session
pub trait StyleHost: Send {
    /// Create (or find) the container the overlay writes to
    fn acquire(&mut self) -> Option<Box<dyn StyleContainer>>;
}
