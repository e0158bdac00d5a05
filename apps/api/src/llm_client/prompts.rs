// Cross-cutting prompt fragments. Feature modules keep their own prompts.rs
// and append these where they need them.

/// Appended to any system prompt whose reply is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Joins a system prompt body with the JSON-only instruction.
pub fn json_only(system: &str) -> String {
    format!("{}\n\n{}", system.trim_end(), JSON_ONLY_INSTRUCTION)
}
