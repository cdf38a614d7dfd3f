/// Trait for widgets that can describe their state in the F5 debug pane
pub trait DebugInfoProvider {
    /// Multi-line, human-readable dump of the widget's state
    fn debug_info(&self) -> String;

    /// Optional: a one-line summary for compact views
    fn debug_summary(&self) -> String {
        "No summary available".to_string()
    }
}
