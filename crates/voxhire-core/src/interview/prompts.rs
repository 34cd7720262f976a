//! Prompt construction for the interview flow
//!
//! Each builder returns the user prompt for one operation; the matching
//! system message lives alongside it. All replies are requested as JSON
//! objects so the service can parse them into typed structs.

use crate::constants::interview::CODING_ROUND_START;

pub const FIRST_QUESTION_SYSTEM: &str = "You are a friendly interviewer for freshers. \
    Ask easy, entry-level questions. Respond ONLY with valid JSON.";

pub const ADAPTIVE_SYSTEM: &str = "You are an adaptive technical interviewer. \
    Ensure variety and adjust difficulty based on candidate performance. \
    Respond ONLY with valid JSON.";

pub const CODING_SYSTEM: &str = "You are a coding interview platform.";

pub const EVALUATOR_SYSTEM: &str = "You are an evaluator. Respond ONLY with valid JSON.";

pub const FINAL_SCORE_SYSTEM: &str = "You are a hiring panel. Respond ONLY with valid JSON.";

/// Whether this question number falls in the coding-challenge rounds.
pub fn is_coding_round(question_number: u32) -> bool {
    question_number >= CODING_ROUND_START
}

pub fn first_question(professional_summary: &str, skills: &str) -> String {
    format!(
        "Candidate Profile:\n\
         - Summary: {professional_summary}\n\
         - Skills: {skills}\n\n\
         Generate the FIRST interview question.\n\
         IMPORTANT: The candidate is a beginner. Keep the question VERY BASIC and SIMPLE.\n\
         Focus on fundamental concepts only.\n\n\
         Output format: JSON object with keys:\n\
         - firstQuestion (object with keys: questionText (string), topic (string), difficulty (string))"
    )
}

/// Prompt for the next question; switches to a coding challenge in the
/// later rounds.
pub fn next_question(
    resume_summary: &str,
    recent_topics: &[String],
    prev_answer: &str,
    question_number: u32,
) -> (&'static str, String) {
    let topics = recent_topics.join(", ");

    if is_coding_round(question_number) {
        let prompt = format!(
            "Resume Summary: {resume_summary}\n\
             Previously Covered: {topics}\n\
             Previous Answer Context: {prev_answer}\n\n\
             Generate a CODING CHALLENGE.\n\n\
             Task:\n\
             1. Create a simple algorithmic problem.\n\
             2. It MUST be different from previous topics ({topics}).\n\
             3. Provide Problem Statement and Example I/O.\n\n\
             Output format: JSON object with keys:\n\
             - questionText (string),\n\
             - topic (string),\n\
             - difficulty (string)"
        );
        (CODING_SYSTEM, prompt)
    } else {
        let prompt = format!(
            "Resume Summary: {resume_summary}\n\
             Topics already asked: [{topics}]\n\
             Last Answer Given: \"{prev_answer}\"\n\n\
             Generate the NEXT interview question.\n\n\
             RULES:\n\
             1. NO REPETITION. Do not ask about [{topics}] again. Pick a completely new topic.\n\
             2. ADAPTIVE DIFFICULTY:\n\
                - Read the \"Last Answer Given\".\n\
                - If it is correct and detailed -> Make the next question \"Intermediate\" (increase depth).\n\
                - If it is vague, short, or wrong -> Keep the next question \"Basic/Easy\".\n\
             3. Keep the tone friendly but professional.\n\n\
             Output format: JSON object with keys: questionText, topic, difficulty (easy|medium)."
        );
        (ADAPTIVE_SYSTEM, prompt)
    }
}

pub fn evaluate_answer(question: &str, answer: &str) -> String {
    format!(
        "Question: {question}\n\
         Answer: {answer}\n\n\
         Evaluate the answer.\n\
         Output format: JSON object with keys: technicalScore (number), clarityScore (number), \
         confidenceScore (number), feedback (string)."
    )
}

pub fn final_score(transcript: &str) -> String {
    format!(
        "Data: {transcript}\n\n\
         Compute final score (0-100) and provide justification.\n\
         Output format: JSON object with keys: finalScore (number), justification (string)."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coding_rounds_start_at_question_six() {
        assert!(!is_coding_round(1));
        assert!(!is_coding_round(5));
        assert!(is_coding_round(6));
        assert!(is_coding_round(8));
    }

    #[test]
    fn next_question_switches_system_message_for_coding_rounds() {
        let topics = vec!["ownership".to_string(), "traits".to_string()];

        let (system, prompt) = next_question("summary", &topics, "an answer", 3);
        assert_eq!(system, ADAPTIVE_SYSTEM);
        assert!(prompt.contains("NO REPETITION"));
        assert!(prompt.contains("ownership, traits"));

        let (system, prompt) = next_question("summary", &topics, "an answer", 6);
        assert_eq!(system, CODING_SYSTEM);
        assert!(prompt.contains("CODING CHALLENGE"));
    }

    #[test]
    fn prompts_embed_their_inputs() {
        let prompt = first_question("Built two web apps", "Rust, SQL");
        assert!(prompt.contains("Built two web apps"));
        assert!(prompt.contains("Rust, SQL"));

        let prompt = evaluate_answer("What is a trait?", "An interface-like thing");
        assert!(prompt.contains("What is a trait?"));
        assert!(prompt.contains("An interface-like thing"));
    }
}
