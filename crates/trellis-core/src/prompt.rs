use anyhow::Result;

/// Interaction capability injected into the planner and the preflight
/// advisor. The terminal implementation asks the operator; the
/// non-interactive implementation maps to defaults and force flags and fails
/// closed when a required choice has no default.
pub trait PromptSource {
    /// Presents `options` and returns the chosen index.
    fn choose(&mut self, prompt: &str, options: &[&str]) -> Result<usize>;

    /// Reads a free-form value.
    fn input(&mut self, prompt: &str) -> Result<String>;

    /// Yes/no question with a default answer.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;
}
