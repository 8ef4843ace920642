//! Phase-specific suggestions from the text generation service

use vitalis_core::assist::{generate_or_fallback, TextGenerator};

use crate::phase::{CyclePhase, PhaseReading};

pub const NO_DATE_MESSAGE: &str = "Enter the date of your last period to get personalized tips.";
pub const TIPS_FALLBACK: &str = "Could not generate tips right now. Try again later.";
pub const SUMMARY_FALLBACK: &str = "Tip of the day: listen to your body and take care of yourself!";

/// Prompt asking for a short markdown guide for the current phase
pub fn tips_prompt(reading: &PhaseReading, name: &str) -> String {
    format!(
        "Act as a friendly, motivating women's wellness coach. Write for {name}, who is in the \
         {phase} phase (day {day} of the cycle). Keep the tone light and easy to follow.\n\
         Formatting rules:\n\
         1. No preamble; start directly with a warm greeting to {name}.\n\
         2. Use markdown with \"### <title> <emoji>\" section headings for training, nutrition \
         and rest.\n\
         3. After each heading give the tip and a bold \"Why:\" line explaining it simply.\n\
         4. End with a short encouraging message.",
        name = name,
        phase = reading.phase.label(),
        day = reading.day_in_cycle,
    )
}

/// Prompt asking for a one-sentence motivational line
pub fn summary_prompt(reading: &PhaseReading) -> String {
    format!(
        "Act as a wellness coach. Write one short (at most 15 words), positive sentence for a \
         woman in the {} phase (day {} of the cycle) that is relevant to that phase.",
        reading.phase.label(),
        reading.day_in_cycle,
    )
}

/// Tips for the current phase; never fails
pub async fn cycle_tips<G>(generator: &G, reading: &PhaseReading, name: &str) -> String
where
    G: TextGenerator + Sync,
{
    if reading.phase == CyclePhase::Unknown {
        return NO_DATE_MESSAGE.to_string();
    }
    generate_or_fallback(generator, &tips_prompt(reading, name), TIPS_FALLBACK).await
}

/// One-line summary for the current phase; never fails
pub async fn cycle_summary<G>(generator: &G, reading: &PhaseReading) -> String
where
    G: TextGenerator + Sync,
{
    if reading.phase == CyclePhase::Unknown {
        return NO_DATE_MESSAGE.to_string();
    }
    let text = generate_or_fallback(generator, &summary_prompt(reading), SUMMARY_FALLBACK).await;
    text.replace('"', "").trim().to_string()
}
