// Cross-cutting prompt fragments shared by every LLM caller.
// Service-specific prompts live next to the service that sends them.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction appended to every rewrite prompt.
pub const FACTUALITY_INSTRUCTION: &str = "\
    CRITICAL: Maintain factual accuracy. Do NOT fabricate employers, titles, dates, \
    degrees, skills, or metrics that are not present in the source text. \
    Rephrase and reorder only.";
