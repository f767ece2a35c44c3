//! The structured answer the narrator must give every turn.
//!
//! Nothing from the generation boundary reaches the game state until it has
//! been rebuilt here field by field. The checks run in a fixed order and stop
//! at the first violation, which is reported with the field's full path.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use taleforge_core::contract::PayloadObject;
use taleforge_core::error::DomainError;
use taleforge_core::ports::ReplyBody;
use taleforge_rules::domain::ability::Stat;
use taleforge_rules::domain::check::DiceCheck;

/// One choice presented to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOption {
    pub text: String,
    pub action_id: String,
    /// Check the player must pass when choosing this option.
    pub check: Option<DiceCheck>,
}

/// A validated narrator response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredTurnResponse {
    pub scene_description: String,
    pub options: Vec<TurnOption>,
    /// The current narrative phase reached its goal.
    pub beat_complete: bool,
    pub player_dead: bool,
    /// Present when the engine must resolve a check before the outcome is
    /// narrated.
    pub required_check: Option<DiceCheck>,
    /// New lore fragments introduced by this scene.
    pub visual_lore_updates: Vec<String>,
}

/// Validates a decoded payload into a [`StructuredTurnResponse`].
///
/// # Errors
///
/// Returns `DomainError::Contract` naming the first missing or mistyped field.
pub fn validate_turn_response(payload: &Value) -> Result<StructuredTurnResponse, DomainError> {
    let object = PayloadObject::root(payload)?;

    let scene_description = object.non_empty_string("scene_description")?.to_owned();

    let options = object
        .array("options")?
        .iter()
        .enumerate()
        .map(|(index, item)| parse_option(item, format!("options[{index}]")))
        .collect::<Result<Vec<_>, _>>()?;

    let beat_complete = object.boolean("beat_complete")?;
    let player_dead = object.boolean("player_dead")?;

    let required_check = object
        .optional("required_check")
        .map(|value| parse_check(value, object.path_of("required_check")))
        .transpose()?;

    let visual_lore_updates = object.string_array("visual_lore_updates")?;

    Ok(StructuredTurnResponse {
        scene_description,
        options,
        beat_complete,
        player_dead,
        required_check,
        visual_lore_updates,
    })
}

/// Decodes a raw generation body and validates it.
///
/// # Errors
///
/// Returns `DomainError::Contract` on `body` if no JSON can be recovered, or
/// the first field violation otherwise.
pub fn parse_turn_reply(body: ReplyBody) -> Result<StructuredTurnResponse, DomainError> {
    validate_turn_response(&body.into_json()?)
}

fn parse_option(value: &Value, path: String) -> Result<TurnOption, DomainError> {
    let object = PayloadObject::at(value, path)?;
    let check = object
        .optional("check")
        .map(|check| parse_check(check, object.path_of("check")))
        .transpose()?;

    Ok(TurnOption {
        text: object.string("text")?.to_owned(),
        action_id: object.non_empty_string("action_id")?.to_owned(),
        check,
    })
}

fn parse_check(value: &Value, path: String) -> Result<DiceCheck, DomainError> {
    let object = PayloadObject::at(value, path)?;
    let raw_stat = object.string("stat")?;
    let stat: Stat = raw_stat.parse().map_err(|_| {
        DomainError::contract(object.path_of("stat"), format!("unknown stat `{raw_stat}`"))
    })?;
    Ok(DiceCheck {
        stat,
        dc: object.integer("dc")?,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn valid_payload() -> Value {
        json!({
            "scene_description": "Rain hammers the chapel roof.",
            "options": [
                { "text": "Force the door", "action_id": "force_door", "check": { "stat": "STR", "dc": 14 } },
                { "text": "Wait", "action_id": "wait", "check": null },
                { "text": "Listen", "action_id": "listen" }
            ],
            "beat_complete": false,
            "player_dead": false,
            "visual_lore_updates": ["Rain-soaked chapel"]
        })
    }

    fn field_of(err: DomainError) -> String {
        match err {
            DomainError::Contract { field, .. } => field,
            other => panic!("expected contract error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_payload_is_accepted() {
        // Arrange
        let payload = valid_payload();

        // Act
        let response = validate_turn_response(&payload).unwrap();

        // Assert
        assert_eq!(response.scene_description, "Rain hammers the chapel roof.");
        assert_eq!(response.options.len(), 3);
        assert_eq!(
            response.options[0].check,
            Some(DiceCheck {
                stat: Stat::Strength,
                dc: 14
            })
        );
        assert_eq!(response.options[1].check, None);
        assert_eq!(response.options[2].check, None);
        assert_eq!(response.required_check, None);
        assert_eq!(response.visual_lore_updates, vec!["Rain-soaked chapel"]);
    }

    #[test]
    fn test_empty_options_and_lore_are_accepted() {
        let mut payload = valid_payload();
        payload["options"] = json!([]);
        payload["visual_lore_updates"] = json!([]);

        let response = validate_turn_response(&payload).unwrap();

        assert!(response.options.is_empty());
        assert!(response.visual_lore_updates.is_empty());
    }

    #[test]
    fn test_missing_scene_description_is_rejected_by_field() {
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove("scene_description");

        let err = validate_turn_response(&payload).unwrap_err();

        assert_eq!(field_of(err), "scene_description");
    }

    #[test]
    fn test_blank_scene_description_is_rejected() {
        let mut payload = valid_payload();
        payload["scene_description"] = json!("   ");

        assert_eq!(field_of(validate_turn_response(&payload).unwrap_err()), "scene_description");
    }

    #[test]
    fn test_mistyped_fields_are_named() {
        let cases = [
            ("options", json!("none"), "options"),
            ("beat_complete", json!("yes"), "beat_complete"),
            ("player_dead", json!(0), "player_dead"),
            ("visual_lore_updates", json!([1]), "visual_lore_updates[0]"),
            ("required_check", json!({ "stat": "LUCK", "dc": 10 }), "required_check.stat"),
            ("required_check", json!({ "stat": "DEX" }), "required_check.dc"),
        ];
        for (key, value, expected) in cases {
            let mut payload = valid_payload();
            payload[key] = value;
            let err = validate_turn_response(&payload).unwrap_err();
            assert_eq!(field_of(err), expected, "setting {key}");
        }
    }

    #[test]
    fn test_malformed_option_is_named_by_index() {
        let mut payload = valid_payload();
        payload["options"][1] = json!({ "text": "Wait" });

        assert_eq!(field_of(validate_turn_response(&payload).unwrap_err()), "options[1].action_id");
    }

    #[test]
    fn test_required_check_is_parsed() {
        let mut payload = valid_payload();
        payload["required_check"] = json!({ "stat": "DEX", "dc": 15 });

        let response = validate_turn_response(&payload).unwrap();

        assert_eq!(
            response.required_check,
            Some(DiceCheck {
                stat: Stat::Dexterity,
                dc: 15
            })
        );
    }

    #[test]
    fn test_non_object_payload_is_rejected() {
        assert_eq!(field_of(validate_turn_response(&json!([1, 2])).unwrap_err()), "payload");
    }

    #[test]
    fn test_fenced_text_reply_is_decoded_and_validated() {
        let text = format!("Here you go:\n```json\n{}\n```", valid_payload());

        let response = parse_turn_reply(ReplyBody::Text(text)).unwrap();

        assert_eq!(response.options[0].action_id, "force_door");
    }

    #[test]
    fn test_unparseable_text_reply_is_a_body_violation() {
        let err = parse_turn_reply(ReplyBody::Text("the narrator mumbles".into())).unwrap_err();

        assert_eq!(field_of(err), "body");
    }
}
