//! Local stand-ins for the AI webhooks, used when `MOCK_AI` is on.

use shared::{EnhancementRequest, EnhancementResult, EvaluationStatus, FieldEvaluation, NarrativeField};

use super::privacy::MemoPayload;

/// Narratives shorter than this get a suggestion
const SHORT_NARRATIVE_CHARS: usize = 20;

fn first_name(child_name: Option<&str>) -> String {
    child_name
        .and_then(|name| name.split_whitespace().next())
        .unwrap_or("The child")
        .to_string()
}

fn place(location: &str) -> String {
    let location = location.trim().to_lowercase();
    if location.is_empty() {
        "classroom".to_string()
    } else {
        location
    }
}

pub fn enhancement(request: &EnhancementRequest, child_name: Option<&str>) -> EnhancementResult {
    let name = first_name(child_name);
    let location = place(&request.location);

    let evaluations = NarrativeField::ALL
        .iter()
        .filter_map(|field| {
            let original = match field {
                NarrativeField::IncidentDescription => &request.incident_description,
                NarrativeField::InjuryDescription => &request.injury_description,
                NarrativeField::ActionTaken => &request.action_taken,
            };
            if original.trim().chars().count() >= SHORT_NARRATIVE_CHARS {
                return None;
            }

            let (suggestion, reason) = match field {
                NarrativeField::IncidentDescription => (
                    format!("{} fell while playing in the {}.", name, location),
                    "Adding more context about what the child was doing helps understand how the incident occurred.",
                ),
                NarrativeField::InjuryDescription => (
                    format!("Small scrape on {}'s right knee. No bleeding, just a red mark about the size of a dime.", name),
                    "Specifying the exact location and appearance of the injury helps assess its severity.",
                ),
                NarrativeField::ActionTaken => (
                    format!("Cleaned the area with soap and water. Gave {} a hug and applied a bandage.", name),
                    "Including both the first aid provided and comfort measures helps show complete care.",
                ),
            };

            Some(FieldEvaluation {
                field: *field,
                original: original.clone(),
                suggestion,
                status: Some(EvaluationStatus::Sufficient),
                reason: reason.to_string(),
            })
        })
        .collect();

    let mut narrative = format!("{} had a minor incident today in the {}. ", name, location);
    if request.is_bite {
        narrative.push_str("Another child bit them during play. ");
    } else if request.is_peer_aggression {
        narrative.push_str("They were pushed by another child. ");
    }
    narrative.push_str(&format!(
        "We took care of it right away and made sure {} was comfortable before returning to activities.",
        name
    ));

    EnhancementResult { evaluations, parent_narrative: Some(narrative) }
}

pub fn memo(payload: &MemoPayload) -> String {
    let child = payload.child_name.as_deref().unwrap_or("your child");

    let mut memo = String::from("Dear Parent/Guardian,\n\n");
    memo.push_str(&format!("This is to inform you that {} had a minor incident today at school. ", child));
    if payload.is_bite {
        memo.push_str("They were bitten by another child during play. ");
    } else if payload.is_peer_aggression {
        memo.push_str("They were involved in an incident with another child. ");
    }
    memo.push_str(&format!(
        "{} {}",
        sentence(&payload.injury_description),
        sentence(&payload.action_taken)
    ));
    memo.push_str("\n\nPlease let us know if you have any questions or concerns.");
    memo.push_str("\n\nSincerely,\nThe Teaching Team");
    memo
}

fn sentence(text: &str) -> String {
    let text = text.trim();
    if text.ends_with('.') || text.is_empty() {
        text.to_string()
    } else {
        format!("{}.", text)
    }
}
