//! Static lookup tables consumed by the browser UI.
//!
//! Served as stored so key order and field names stay exactly what the
//! UI indexes into (`tools`, `name`, `duration`, `features`,
//! `aspectRatios`, `resolutions`; `system`, `version`, `models`,
//! `features`, `elements`).

const ALL_TOOLS_SCHEMA: &str = include_str!("catalog/all_tools_schema.json");
const VIDEO_PROMPT_SYSTEM: &str = include_str!("catalog/video_prompt_system.json");

/// Tool catalog body
pub fn all_tools_schema() -> &'static str
{   ALL_TOOLS_SCHEMA.trim_end()
}

/// Prompt system / element catalog body
pub fn video_prompt_system() -> &'static str
{   VIDEO_PROMPT_SYSTEM.trim_end()
}
