pub const STONE_ANALYSIS: &str = include_str!("../data/prompts/stone_analysis.txt");

/// Analysis shown alongside the bundled default image. Displayed on first
/// load without calling the inference service.
pub const DEFAULT_ANALYSIS: &str = include_str!("../data/default_analysis.txt");
