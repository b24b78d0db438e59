use clashhub_api::{FieldDefinition, FieldOwner, FieldType, FieldValue, PlayerSubmission,
    RegistrationRequest, Tournament};
use std::collections::HashMap;

/// Team-registration form state. Built from a tournament's field definitions;
/// collects values keyed by field id, validates, and groups the result into
/// team fields and per-player submissions.
#[derive(Debug, Default)]
pub struct RegistrationForm {
    pub tournament_id: u64,
    fields: Vec<FieldDefinition>,
    values: HashMap<u64, String>,
    pub errors: HashMap<u64, String>,
}

impl RegistrationForm {
    pub fn for_tournament(tournament: &Tournament) -> Self {
        Self {
            tournament_id: tournament.id,
            fields: tournament.required_fields.clone(),
            values: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn set_value(&mut self, field_id: u64, value: impl Into<String>) {
        self.values.insert(field_id, value.into());
        self.errors.remove(&field_id);
    }

    pub fn value(&self, field_id: u64) -> &str {
        self.values.get(&field_id).map(String::as_str).unwrap_or_default()
    }

    /// Check every field, collecting per-field messages. Returns true when
    /// the form is submittable.
    pub fn validate(&mut self) -> bool {
        self.errors.clear();
        for field in &self.fields {
            let value = self.values.get(&field.id).map(String::as_str).unwrap_or_default();
            let value = value.trim();
            if value.is_empty() {
                if field.required {
                    self.errors.insert(field.id, "This field is required.".into());
                }
                continue;
            }
            if field.field_type == FieldType::Number && value.parse::<f64>().is_err() {
                self.errors.insert(field.id, "Must be a number.".into());
            }
        }
        self.errors.is_empty()
    }

    /// Validate and assemble the submission. Empty optional fields are left
    /// out; player fields are grouped by their owner index, with every slot
    /// up to the highest used index present so positions stay aligned.
    pub fn build(&mut self) -> Option<RegistrationRequest> {
        if !self.validate() {
            return None;
        }

        let mut team_fields = Vec::new();
        let mut player_count = 0u32;
        for field in &self.fields {
            if let FieldOwner::Player(i) = field.owner {
                player_count = player_count.max(i + 1);
            }
        }
        let mut players = vec![PlayerSubmission::default(); player_count as usize];

        for field in &self.fields {
            let Some(value) = self.values.get(&field.id) else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let entry = FieldValue { field_definition_id: field.id, value: value.to_owned() };
            match field.owner {
                FieldOwner::Team => team_fields.push(entry),
                FieldOwner::Player(i) => players[i as usize].field_values.push(entry),
            }
        }

        Some(RegistrationRequest { team_fields, player_submissions: players })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(id: u64, name: &str, field_type: FieldType, required: bool, owner: FieldOwner) -> FieldDefinition {
        FieldDefinition { id, name: name.into(), field_type, required, owner }
    }

    fn form() -> RegistrationForm {
        RegistrationForm {
            tournament_id: 1,
            fields: vec![
                field(1, "Team Name", FieldType::Text, true, FieldOwner::Team),
                field(2, "Player 1 IGN", FieldType::Text, true, FieldOwner::Player(0)),
                field(3, "Player 2 IGN", FieldType::Text, true, FieldOwner::Player(1)),
                field(4, "Player 2 Trophies", FieldType::Number, false, FieldOwner::Player(1)),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn missing_required_fields_produce_per_field_errors() {
        let mut f = form();
        f.set_value(1, "Alpha");
        assert!(!f.validate());
        assert!(!f.errors.contains_key(&1));
        assert_eq!(f.errors.get(&2).map(String::as_str), Some("This field is required."));
        assert_eq!(f.errors.get(&3).map(String::as_str), Some("This field is required."));
        assert!(!f.errors.contains_key(&4));
    }

    #[test]
    fn number_fields_must_parse() {
        let mut f = form();
        f.set_value(1, "Alpha");
        f.set_value(2, "Kiran");
        f.set_value(3, "Maya");
        f.set_value(4, "lots");
        assert!(!f.validate());
        assert_eq!(f.errors.get(&4).map(String::as_str), Some("Must be a number."));

        f.set_value(4, "5200");
        assert!(f.validate());
    }

    #[test]
    fn build_groups_values_by_owner() {
        let mut f = form();
        f.set_value(1, "Alpha");
        f.set_value(2, "Kiran");
        f.set_value(3, "Maya");
        f.set_value(4, "5200");

        let request = f.build().unwrap();
        assert_eq!(request.team_fields, vec![FieldValue {
            field_definition_id: 1,
            value: "Alpha".into(),
        }]);
        assert_eq!(request.player_submissions.len(), 2);
        assert_eq!(request.player_submissions[0].field_values, vec![FieldValue {
            field_definition_id: 2,
            value: "Kiran".into(),
        }]);
        assert_eq!(request.player_submissions[1].field_values.len(), 2);
    }

    #[test]
    fn empty_optional_values_are_omitted() {
        let mut f = form();
        f.set_value(1, "Alpha");
        f.set_value(2, "Kiran");
        f.set_value(3, "Maya");
        f.set_value(4, "   ");

        let request = f.build().unwrap();
        assert_eq!(request.player_submissions[1].field_values.len(), 1);
    }

    #[test]
    fn build_fails_while_invalid() {
        let mut f = form();
        assert!(f.build().is_none());
        assert!(!f.errors.is_empty());
    }

    #[test]
    fn editing_a_field_clears_its_error() {
        let mut f = form();
        f.validate();
        assert!(f.errors.contains_key(&1));
        f.set_value(1, "Alpha");
        assert!(!f.errors.contains_key(&1));
    }
}
