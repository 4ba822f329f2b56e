// Cross-cutting prompt fragments. Feature prompts live next to the feature
// (see ai/prompts.rs) and splice these in.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with a single valid JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every prompt that writes on the candidate's behalf.
pub const NO_FABRICATION_INSTRUCTION: &str = "\
    Only use facts present in the candidate profile and job posting below. \
    Do NOT invent employers, degrees, certifications, years of experience or metrics. \
    If something the job asks for is missing from the profile, do not claim it.";
