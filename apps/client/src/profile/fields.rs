use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::errors::{ProfileError, ValueError};
use crate::profile::models::Profile;

/// Every key of the profile schema. Field names outside this set cannot be
/// addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Email,
    UniversityPrn,
    FirstName,
    MiddleName,
    LastName,
    FullName,
    MobileNumber,
    Dob,
    Gender,
    Degree,
    Specialization,
    CollegeName,
    GraduationYear,
    TenthPercent,
    TwelfthPercent,
    DiplomaPercent,
    BePercent,
    Cgpa,
    TechnicalAchievements,
    PersonalAchievements,
    Project,
    CodechefLink,
    CodechefRating,
    HackerrankLink,
    HackerrankRating,
    LeetcodeLink,
    LeetcodeProblemCount,
    CocubeScore,
}

impl ProfileField {
    pub const ALL: [ProfileField; 28] = [
        ProfileField::Email,
        ProfileField::UniversityPrn,
        ProfileField::FirstName,
        ProfileField::MiddleName,
        ProfileField::LastName,
        ProfileField::FullName,
        ProfileField::MobileNumber,
        ProfileField::Dob,
        ProfileField::Gender,
        ProfileField::Degree,
        ProfileField::Specialization,
        ProfileField::CollegeName,
        ProfileField::GraduationYear,
        ProfileField::TenthPercent,
        ProfileField::TwelfthPercent,
        ProfileField::DiplomaPercent,
        ProfileField::BePercent,
        ProfileField::Cgpa,
        ProfileField::TechnicalAchievements,
        ProfileField::PersonalAchievements,
        ProfileField::Project,
        ProfileField::CodechefLink,
        ProfileField::CodechefRating,
        ProfileField::HackerrankLink,
        ProfileField::HackerrankRating,
        ProfileField::LeetcodeLink,
        ProfileField::LeetcodeProblemCount,
        ProfileField::CocubeScore,
    ];

    /// The JSON key the backend uses for this field.
    pub fn key(self) -> &'static str {
        match self {
            ProfileField::Email => "email",
            ProfileField::UniversityPrn => "universityPRN",
            ProfileField::FirstName => "firstName",
            ProfileField::MiddleName => "middleName",
            ProfileField::LastName => "lastName",
            ProfileField::FullName => "fullName",
            ProfileField::MobileNumber => "mobileNumber",
            ProfileField::Dob => "dob",
            ProfileField::Gender => "gender",
            ProfileField::Degree => "degree",
            ProfileField::Specialization => "specialization",
            ProfileField::CollegeName => "collegeName",
            ProfileField::GraduationYear => "graduationYear",
            ProfileField::TenthPercent => "tenthPercent",
            ProfileField::TwelfthPercent => "twelfthPercent",
            ProfileField::DiplomaPercent => "diplomaPercent",
            ProfileField::BePercent => "BEPercent",
            ProfileField::Cgpa => "cgpa",
            ProfileField::TechnicalAchievements => "technicalAchievements",
            ProfileField::PersonalAchievements => "personalAchievements",
            ProfileField::Project => "project",
            ProfileField::CodechefLink => "codechefLink",
            ProfileField::CodechefRating => "codechefRating",
            ProfileField::HackerrankLink => "hackerrankLink",
            ProfileField::HackerrankRating => "hackerrankRating",
            ProfileField::LeetcodeLink => "leetcodeLink",
            ProfileField::LeetcodeProblemCount => "leetcodeproblemcount",
            ProfileField::CocubeScore => "cocubeScore",
        }
    }

    pub fn is_rating(self) -> bool {
        matches!(
            self,
            ProfileField::CodechefRating | ProfileField::HackerrankRating
        )
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ProfileField {
    type Err = ProfileError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ProfileField::ALL
            .iter()
            .copied()
            .find(|field| field.key() == name)
            .ok_or_else(|| ProfileError::UnknownField(name.to_string()))
    }
}

/// Parses an optional value; blank input clears the field.
fn optional<T>(raw: &str) -> Result<Option<T>, ValueError>
where
    T: FromStr<Err = ValueError>,
{
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed.parse().map(Some)
}

fn optional_date(raw: &str) -> Result<Option<NaiveDate>, ValueError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ValueError::InvalidDate(raw.to_string()))
}

impl Profile {
    /// Writes one field from the raw text a form input would carry.
    ///
    /// The value is fully validated before anything is written, so a rejected
    /// value leaves the profile unchanged. Blank input resets optional fields
    /// and ratings to their defaults; free-text fields are stored verbatim.
    pub fn set(&mut self, field: ProfileField, raw: &str) -> Result<(), ProfileError> {
        let invalid = |source| ProfileError::InvalidValue { field, source };
        let text = raw.to_string();

        match field {
            ProfileField::Email => self.email = text,
            ProfileField::UniversityPrn => self.university_prn = text,
            ProfileField::FirstName => self.first_name = text,
            ProfileField::MiddleName => self.middle_name = text,
            ProfileField::LastName => self.last_name = text,
            ProfileField::FullName => self.full_name = text,
            ProfileField::MobileNumber => self.mobile_number = text,
            ProfileField::Dob => self.dob = optional_date(raw).map_err(invalid)?,
            ProfileField::Gender => self.gender = optional(raw).map_err(invalid)?,
            ProfileField::Degree => self.degree = optional(raw).map_err(invalid)?,
            ProfileField::Specialization => {
                self.specialization = optional(raw).map_err(invalid)?
            }
            ProfileField::CollegeName => self.college_name = optional(raw).map_err(invalid)?,
            ProfileField::GraduationYear => self.graduation_year = text,
            ProfileField::TenthPercent => self.tenth_percent = optional(raw).map_err(invalid)?,
            ProfileField::TwelfthPercent => {
                self.twelfth_percent = optional(raw).map_err(invalid)?
            }
            ProfileField::DiplomaPercent => {
                self.diploma_percent = optional(raw).map_err(invalid)?
            }
            ProfileField::BePercent => self.be_percent = optional(raw).map_err(invalid)?,
            ProfileField::Cgpa => self.cgpa = optional(raw).map_err(invalid)?,
            ProfileField::TechnicalAchievements => self.technical_achievements = text,
            ProfileField::PersonalAchievements => self.personal_achievements = text,
            ProfileField::Project => self.project = text,
            ProfileField::CodechefLink => self.codechef_link = optional(raw).map_err(invalid)?,
            ProfileField::CodechefRating => {
                self.codechef_rating = optional(raw).map_err(invalid)?.unwrap_or_default()
            }
            ProfileField::HackerrankLink => {
                self.hackerrank_link = optional(raw).map_err(invalid)?
            }
            ProfileField::HackerrankRating => {
                self.hackerrank_rating = optional(raw).map_err(invalid)?.unwrap_or_default()
            }
            ProfileField::LeetcodeLink => self.leetcode_link = optional(raw).map_err(invalid)?,
            ProfileField::LeetcodeProblemCount => self.leetcode_problem_count = text,
            ProfileField::CocubeScore => self.cocube_score = text,
        }

        Ok(())
    }
}
