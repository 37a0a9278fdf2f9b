use crate::cli::ServiceKind;

/// The search form as last submitted. Export requests re-send exactly these
/// values, never the client-side sorted/filtered view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchForm {
    pub rank: u32,
    pub category: String,
    pub college_type: String,
    pub branch: String,
    /// Counselling round, JOSAA only
    pub round: Option<u8>,
    /// Minimum admission probability in percent, JOSAA only
    pub min_probability: Option<u8>,
}

impl SearchForm {
    /// Multipart field names and values for the given service. The two
    /// backends spell the same concepts differently (quota vs college_type,
    /// rank vs jee_rank); the mapping lives here and nowhere else.
    pub fn fields(&self, service: ServiceKind) -> Vec<(&'static str, String)> {
        match service {
            ServiceKind::Josaa => {
                let mut fields = vec![
                    ("jee_rank", self.rank.to_string()),
                    ("category", self.category.clone()),
                    ("college_type", self.college_type.clone()),
                    ("preferred_branch", self.branch.clone()),
                ];
                if let Some(round) = self.round {
                    fields.push(("round_no", round.to_string()));
                }
                if let Some(min_probability) = self.min_probability {
                    fields.push(("min_probability", min_probability.to_string()));
                }
                fields
            }
            ServiceKind::Mhtcet => vec![
                ("rank", self.rank.to_string()),
                ("category", self.category.clone()),
                ("quota", self.college_type.clone()),
                ("branch", self.branch.clone()),
            ],
        }
    }
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            rank: 0,
            category: "All".to_string(),
            college_type: "All".to_string(),
            branch: "All".to_string(),
            round: None,
            min_probability: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> SearchForm {
        SearchForm {
            rank: 4521,
            category: "OBC".to_string(),
            college_type: "NIT".to_string(),
            branch: "Computer Science".to_string(),
            round: Some(3),
            min_probability: Some(20),
        }
    }

    #[test]
    fn test_josaa_field_names() {
        let fields = form().fields(ServiceKind::Josaa);
        assert_eq!(
            fields,
            vec![
                ("jee_rank", "4521".to_string()),
                ("category", "OBC".to_string()),
                ("college_type", "NIT".to_string()),
                ("preferred_branch", "Computer Science".to_string()),
                ("round_no", "3".to_string()),
                ("min_probability", "20".to_string()),
            ]
        );
    }

    #[test]
    fn test_mhtcet_field_names() {
        let fields = form().fields(ServiceKind::Mhtcet);
        assert_eq!(
            fields,
            vec![
                ("rank", "4521".to_string()),
                ("category", "OBC".to_string()),
                ("quota", "NIT".to_string()),
                ("branch", "Computer Science".to_string()),
            ]
        );
    }

    #[test]
    fn test_mhtcet_omits_josaa_only_fields() {
        let fields = form().fields(ServiceKind::Mhtcet);
        assert!(fields.iter().all(|(name, _)| *name != "round_no"));
        assert!(fields.iter().all(|(name, _)| *name != "min_probability"));
    }
}
