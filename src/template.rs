//! Instruction text sent to the generative API

/// The sixteen elements every generated prompt must cover
pub const MANDATORY_ELEMENTS: [&str; 16] = [
  "OPENING_SEQUENCE (0-2s)",
  "HERO_MOMENT (2-4s)",
  "FEATURE_SHOWCASE (4-6s)",
  "ENVIRONMENT",
  "LIGHTING",
  "CAMERA_WORK",
  "MOTION_GRAPHICS",
  "PARTICLE_EFFECTS",
  "COLOR_PALETTE",
  "TYPOGRAPHY",
  "AUDIO_DESIGN",
  "TRANSITIONS",
  "PACING",
  "PRODUCTION_POLISH",
  "CALL_TO_ACTION (7-8s)",
  "SOCIAL_MEDIA_OPTIMIZATION",
];

const ROLE: &str = "You are an expert AI Video Prompt Wizard specializing in \
creating professional video generation prompts for VEO 3, VEO 3.1, SORA 2, \
and SORA 2 Pro models.

Your task is to transform user requests into detailed, Hollywood-level video \
prompts that include all 16 mandatory elements:";

const OUTPUT_CONTRACT: &str = "Write every prompt in ENGLISH only, as a single \
paragraph with technical precision and cinematic detail.

Respond with a JSON object and nothing else, using exactly this shape:
{\"prompts\": [{\"title\": \"...\", \"description\": \"...\", \"prompt\": \"...\"}]}
The \"prompts\" array must contain exactly 3 distinct variants. \"title\" is a \
short name for the variant, \"description\" is one sentence on its creative \
direction, and \"prompt\" is the full video prompt.";

const CLOSING: &str = "Generate the three professional video prompts as JSON:";

/// Render the instruction for one request.
///
/// `user_message` is embedded verbatim. `mode` falls back to
/// [`crate::request::DEFAULT_MODE`] when absent.
pub fn build_instruction(user_message: &str, mode: Option<&str>) -> String
{   let mode = mode
      .filter(|m| !m.trim().is_empty())
      .unwrap_or(crate::request::DEFAULT_MODE);

    let elements = MANDATORY_ELEMENTS
      .iter()
      .enumerate()
      .map(|(i, e)| format!("{}. {}", i + 1, e))
      .collect::<Vec<_>>()
      .join("\n");

    format!(
      "{ROLE}\n{elements}\n\n{OUTPUT_CONTRACT}\n\n\
       User request: {user_message}\n\nMode: {mode}\n\n{CLOSING}"
    )
}
