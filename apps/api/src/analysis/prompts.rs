pub const COACH_SYSTEM: &str = "\
    You are an expert CV (resume) reviewer and career coach. \
    You receive a CV as JSON together with a rule-based analysis of it. \
    Ground every piece of advice in that analysis and in the CV text; never invent experience. \
    Be encouraging but honest. Explain why each change would help, favour quantified achievements, \
    and mention missing keywords when they matter for applicant tracking systems.";

/// Builds the coaching prompt. `cv_json` and `analysis_json` are serialized inputs.
pub fn build_coach_prompt(cv_json: &str, analysis_json: &str, target_role: Option<&str>) -> String {
    let role_line = match target_role {
        Some(role) => format!("The candidate is targeting this role: {role}. Tailor the advice to it.\n"),
        None => String::new(),
    };

    format!(
        r#"{role_line}
CV:
{cv_json}

Rule-based analysis (scores are 0-100):
{analysis_json}

Return a JSON object with exactly these fields:
{{
  "headline": "one sentence on where the CV stands overall",
  "priorities": ["the most important improvements, highest impact first (3-5 items)"],
  "keywordAdvice": ["how to work missing keywords in honestly (0-3 items)"],
  "encouragement": "one or two sentences on what the CV already does well"
}}"#
    )
}
