//! Search form modal state and focus management.
//!
//! Field values survive close/reopen and failed searches; only an explicit
//! reset clears them. The JOSAA flavor carries two extra fields (round,
//! minimum probability) that the focus cycle skips for MHTCET.

use crate::cli::ServiceKind;
use crate::form::SearchForm;

pub const MIN_ROUND: u8 = 1;
pub const MAX_ROUND: u8 = 6;
const PROBABILITY_STEP: u8 = 5;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    #[default]
    Rank,
    Category,
    CollegeType,
    Branch,
    Round,
    MinProbability,
    Submit,
    Cancel,
}

pub struct SearchModal {
    pub active: bool,
    pub focus: SearchFocus,
    pub rank: String,
    pub category: String,
    pub college_type: String,
    pub branch: String,
    pub round: u8,
    pub min_probability: u8,
    pub error: Option<String>,
}

impl Default for SearchModal {
    fn default() -> Self {
        Self {
            active: false,
            focus: SearchFocus::default(),
            rank: String::new(),
            category: "All".to_string(),
            college_type: "All".to_string(),
            branch: "All".to_string(),
            round: MIN_ROUND,
            min_probability: 0,
            error: None,
        }
    }
}

impl SearchModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.active = true;
        self.focus = SearchFocus::Rank;
        self.error = None;
    }

    pub fn close(&mut self) {
        self.active = false;
        self.error = None;
    }

    pub fn next_focus(&mut self, service: ServiceKind) {
        self.focus = match self.focus {
            SearchFocus::Rank => SearchFocus::Category,
            SearchFocus::Category => SearchFocus::CollegeType,
            SearchFocus::CollegeType => SearchFocus::Branch,
            SearchFocus::Branch => match service {
                ServiceKind::Josaa => SearchFocus::Round,
                ServiceKind::Mhtcet => SearchFocus::Submit,
            },
            SearchFocus::Round => SearchFocus::MinProbability,
            SearchFocus::MinProbability => SearchFocus::Submit,
            SearchFocus::Submit => SearchFocus::Cancel,
            SearchFocus::Cancel => SearchFocus::Rank,
        };
    }

    pub fn prev_focus(&mut self, service: ServiceKind) {
        self.focus = match self.focus {
            SearchFocus::Rank => SearchFocus::Cancel,
            SearchFocus::Category => SearchFocus::Rank,
            SearchFocus::CollegeType => SearchFocus::Category,
            SearchFocus::Branch => SearchFocus::CollegeType,
            SearchFocus::Round => SearchFocus::Branch,
            SearchFocus::MinProbability => SearchFocus::Round,
            SearchFocus::Submit => match service {
                ServiceKind::Josaa => SearchFocus::MinProbability,
                ServiceKind::Mhtcet => SearchFocus::Branch,
            },
            SearchFocus::Cancel => SearchFocus::Submit,
        };
    }

    fn field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            SearchFocus::Rank => Some(&mut self.rank),
            SearchFocus::Category => Some(&mut self.category),
            SearchFocus::CollegeType => Some(&mut self.college_type),
            SearchFocus::Branch => Some(&mut self.branch),
            _ => None,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        // The rank field only accepts digits
        if self.focus == SearchFocus::Rank && !c.is_ascii_digit() {
            return;
        }
        if let Some(field) = self.field_mut() {
            field.push(c);
            self.error = None;
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.field_mut() {
            field.pop();
            self.error = None;
        }
    }

    /// Step the focused selector field up or down
    pub fn adjust(&mut self, delta: i16) {
        match self.focus {
            SearchFocus::Round => {
                let round = self.round as i16 + delta;
                self.round = round.clamp(MIN_ROUND as i16, MAX_ROUND as i16) as u8;
            }
            SearchFocus::MinProbability => {
                let value = self.min_probability as i16 + delta * PROBABILITY_STEP as i16;
                self.min_probability = value.clamp(0, 100) as u8;
            }
            _ => {}
        }
    }

    /// Label for the rank field; the JOSAA flavor relabels it by college type
    pub fn rank_label(&self, service: ServiceKind) -> &'static str {
        match service {
            ServiceKind::Josaa => {
                if self.college_type.eq_ignore_ascii_case("IIT") {
                    "Your JEE Advanced Rank"
                } else {
                    "Your JEE Main Rank"
                }
            }
            ServiceKind::Mhtcet => "Your MHTCET Rank",
        }
    }

    /// Label for the college-type field per service vocabulary
    pub fn college_type_label(&self, service: ServiceKind) -> &'static str {
        match service {
            ServiceKind::Josaa => "College Type",
            ServiceKind::Mhtcet => "Quota",
        }
    }

    /// Validate the fields and build the form to submit
    pub fn build(&self, service: ServiceKind) -> Result<SearchForm, String> {
        let rank: u32 = match self.rank.trim().parse() {
            Ok(rank) if rank >= 1 => rank,
            _ => {
                return Err(match service {
                    ServiceKind::Josaa => "Please enter a valid JEE rank".to_string(),
                    ServiceKind::Mhtcet => "Please enter a valid rank".to_string(),
                })
            }
        };
        if self.category.trim().is_empty() {
            return Err("Please select a category".to_string());
        }
        if self.college_type.trim().is_empty() {
            return Err(match service {
                ServiceKind::Josaa => "Please select a college type".to_string(),
                ServiceKind::Mhtcet => "Please select a quota".to_string(),
            });
        }

        Ok(SearchForm {
            rank,
            category: self.category.trim().to_string(),
            college_type: self.college_type.trim().to_string(),
            branch: self.branch.trim().to_string(),
            round: match service {
                ServiceKind::Josaa => Some(self.round),
                ServiceKind::Mhtcet => None,
            },
            min_probability: match service {
                ServiceKind::Josaa => Some(self.min_probability),
                ServiceKind::Mhtcet => None,
            },
        })
    }
}
